use thiserror::Error;
use uuid::Uuid;

/// Rejections raised at the model boundary. The engines assume
/// already-validated data and never re-check silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("item name must not be empty")]
    EmptyItemName,
    #[error("group name must not be empty")]
    EmptyGroupName,
    #[error("cycle days must be within {min}..={max}, got {got}")]
    CycleOutOfRange { got: u16, min: u16, max: u16 },
    #[error("notify-before days must be at most {max}, got {got}")]
    NotifyBeforeOutOfRange { got: u16, max: u16 },
    #[error("default groups cannot be deleted")]
    DefaultGroupProtected,
    #[error("group reorder must list every group exactly once")]
    IncompleteReorder,
    #[error("unknown item {0}")]
    UnknownItem(Uuid),
    #[error("unknown group {0}")]
    UnknownGroup(Uuid),
}
