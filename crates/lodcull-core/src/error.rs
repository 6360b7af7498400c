//! Error taxonomy for registration, scanning and sweeping.

use crate::group::GroupId;

/// Coarse classification of a [`LodError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A candidate or group is set up in a way the system cannot use. Non-fatal.
    Configuration,
    /// An id does not fit the allocated storage. The write is skipped.
    Bounds,
    /// A referenced scene handle (camera, owner) cannot be resolved.
    MissingReference,
}

/// Errors reported by the culling system.
///
/// All of them are local to one candidate or group; none leaves member
/// visibility half-applied.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LodError {
    #[error("LOD group owner {owner} has no children")]
    NoChildren { owner: String },

    #[error("LOD group candidate {owner} is disabled")]
    CandidateDisabled { owner: String },

    #[error("LOD group {id} has no child {list}")]
    EmptyMembership { id: GroupId, list: &'static str },

    #[error("ticket for group {id} belongs to epoch {ticket_epoch}, registry is at epoch {epoch}")]
    StaleTicket {
        id: GroupId,
        ticket_epoch: u64,
        epoch: u64,
    },

    #[error("group {id} registered after storage was sized for {capacity} groups")]
    LateRegistration { id: GroupId, capacity: usize },

    #[error("group {id} can't be stored: storage holds {capacity} groups")]
    OutOfBounds { id: GroupId, capacity: usize },

    #[error("slot for group {id} is already written")]
    SlotOccupied { id: GroupId },

    #[error("slot for group {id} was never populated")]
    UnpopulatedSlot { id: GroupId },

    #[error("no LOD group with id {id}")]
    UnknownGroup { id: GroupId },

    #[error("culling distance {distance} must be finite and non-negative")]
    InvalidDistance { distance: f32 },

    #[error("owner of group {id} no longer exists")]
    MissingOwner { id: GroupId },

    #[error("main camera could not be resolved")]
    MissingCamera,
}

impl LodError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OutOfBounds { .. } => ErrorKind::Bounds,
            Self::MissingCamera | Self::MissingOwner { .. } => ErrorKind::MissingReference,
            Self::NoChildren { .. }
            | Self::CandidateDisabled { .. }
            | Self::EmptyMembership { .. }
            | Self::StaleTicket { .. }
            | Self::LateRegistration { .. }
            | Self::SlotOccupied { .. }
            | Self::UnpopulatedSlot { .. }
            | Self::UnknownGroup { .. }
            | Self::InvalidDistance { .. } => ErrorKind::Configuration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            LodError::OutOfBounds {
                id: GroupId(4),
                capacity: 4
            }
            .kind(),
            ErrorKind::Bounds
        );
        assert_eq!(LodError::MissingCamera.kind(), ErrorKind::MissingReference);
        assert_eq!(
            LodError::NoChildren {
                owner: "block".into()
            }
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            LodError::LateRegistration {
                id: GroupId(4),
                capacity: 4
            }
            .kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_messages_name_the_group() {
        let err = LodError::OutOfBounds {
            id: GroupId(7),
            capacity: 3,
        };
        assert_eq!(
            err.to_string(),
            "group 7 can't be stored: storage holds 3 groups"
        );
    }
}
