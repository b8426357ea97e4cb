use std::fmt;

use crate::PlayerRef;

/// Reason a track stopped playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackEndReason {
    /// The track reached its end.
    Finished,

    /// The track failed to start or stopped with an error.
    LoadFailed,

    /// The track was stopped by the user.
    Stopped,

    /// A new track was started before this one finished.
    Replaced,

    /// The player released the track after going unattended for too long.
    Cleanup,
}

impl TrackEndReason {
    /// Whether the player may move on to the next queued track.
    #[must_use]
    pub const fn may_start_next(self) -> bool {
        matches!(self, Self::Finished | Self::LoadFailed)
    }
}

impl fmt::Display for TrackEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Finished => "finished",
            Self::LoadFailed => "load_failed",
            Self::Stopped => "stopped",
            Self::Replaced => "replaced",
            Self::Cleanup => "cleanup",
        };

        f.write_str(name)
    }
}

/// A notification published by a player.
#[derive(Clone, Debug)]
pub enum PlayerEvent {
    /// The player started playing a track.
    TrackStart {
        /// The player that emitted the event.
        player: PlayerRef,
    },

    /// The player stopped playing a track.
    TrackEnd {
        /// The player that emitted the event.
        player: PlayerRef,

        /// Why the track ended.
        reason: TrackEndReason,
    },

    /// Any other player notification, such as a pause or a stuck track.
    Other {
        /// Name of the event kind.
        kind: &'static str,
    },
}

impl PlayerEvent {
    /// Name of the event kind, suitable for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TrackStart { .. } => "track_start",
            Self::TrackEnd { .. } => "track_end",
            Self::Other { kind } => *kind,
        }
    }
}
