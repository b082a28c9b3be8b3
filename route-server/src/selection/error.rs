//! Selection errors.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// The id is not in the current candidate set
    #[error("unknown route: {0}")]
    UnknownRoute(String),

    /// The session task has stopped
    #[error("selection session closed")]
    Closed,
}
