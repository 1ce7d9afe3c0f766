//! Gallery screen state errors.

/// Actions refused by the gallery state machine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StateErrorKind {
    /// The action does not apply to the current selection mode
    #[display("Action requires {} mode", _0)]
    InvalidMode(String),
    /// An upload is already running
    #[display("An upload is already in progress")]
    Busy,
    /// Nothing is selected
    #[display("No items selected")]
    EmptySelection,
}

/// State machine error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("State Error: {} at line {} in {}", kind, line, file)]
pub struct StateError {
    kind: StateErrorKind,
    line: u32,
    file: &'static str,
}

impl StateError {
    /// Create a new state error with caller location tracking.
    #[track_caller]
    pub fn new(kind: StateErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StateErrorKind {
        &self.kind
    }
}
