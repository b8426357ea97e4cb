use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use crate::Player;

/// Shared handle to a player.
///
/// Two handles are equal iff they point at the same player instance; the
/// player's own state never takes part in comparison or hashing.
#[derive(Clone)]
pub struct PlayerRef(Arc<dyn Player>);

impl PlayerRef {
    /// Wrap a player in a new shared handle.
    pub fn new<P: Player>(player: P) -> Self {
        Self(Arc::new(player))
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0).cast::<()>()
    }
}

impl<P: Player> From<Arc<P>> for PlayerRef {
    fn from(player: Arc<P>) -> Self {
        Self(player)
    }
}

impl From<Arc<dyn Player>> for PlayerRef {
    fn from(player: Arc<dyn Player>) -> Self {
        Self(player)
    }
}

impl Deref for PlayerRef {
    type Target = dyn Player;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for PlayerRef {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.addr(), other.addr())
    }
}

impl Eq for PlayerRef {}

impl Hash for PlayerRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for PlayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerRef({:p})", self.addr())
    }
}
