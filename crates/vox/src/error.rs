use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoxError {
    /// Caller passed a missing or empty buffer, or a frame that does not
    /// match the negotiated format. The call had no effect.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// A session could not obtain the resources it needs. Nothing was left
    /// registered.
    #[error("Allocation failure: {0}")]
    AllocationFailure(String),
}
