//! Error types for the dialog host.

/// Errors raised while creating or persisting a dialog host.
///
/// Note what is *not* here: an expired content handle is a silent abandon
/// path, not an error, and show/dismiss races resolve deterministically.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The dialog identifier was empty.
    #[error("Dialog identifier must not be empty.")]
    EmptyIdentifier,

    /// The container region for plain content does not exist in the host's
    /// layout. A caller-configuration defect, not recoverable at runtime.
    #[error("Fragment container region not found in the host layout.")]
    MissingContainer,

    /// The persisted snapshot could not be encoded or decoded.
    #[error("Configuration snapshot failed to round-trip: {0}")]
    Snapshot(#[from] serde_json::Error),
}
