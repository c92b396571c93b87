//! Error types for the Amazon Photos provider

use core_transfer::TransferError;
use thiserror::Error;

/// Amazon Photos provider errors
#[derive(Error, Debug)]
pub enum AmazonError {
    /// The account has no Amazon Drive customer record
    #[error("Register for an Amazon account and try again")]
    CustomerNotRegistered,

    /// The account has no root folder
    #[error("Amazon Drive root folder not found")]
    RootNodeMissing,

    /// A created node came back without an id
    #[error("Amazon Drive returned a node without an id")]
    MissingNodeId,

    /// Source media had no bytes
    #[error("Empty content for {title}")]
    EmptyUpload { title: String },

    /// Photo is staged in the job store but no store was configured
    #[error("No job store available for staged photo {title}")]
    JobStoreMissing { title: String },

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Bridge(#[from] bridge_traits::error::BridgeError),

    #[error("Failed to read media: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Amazon Photos operations
pub type Result<T> = std::result::Result<T, AmazonError>;

impl From<AmazonError> for TransferError {
    fn from(error: AmazonError) -> Self {
        match error {
            AmazonError::Transfer(e) => e,
            AmazonError::Bridge(e) => e.into(),
            AmazonError::Io(e) => TransferError::transient(e.to_string()),
            e @ AmazonError::MissingNodeId => TransferError::transient(e.to_string()),
            e @ (AmazonError::CustomerNotRegistered
            | AmazonError::RootNodeMissing
            | AmazonError::EmptyUpload { .. }
            | AmazonError::JobStoreMissing { .. }) => TransferError::Validation(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AmazonError::EmptyUpload {
            title: "beach.jpg".to_string(),
        };
        assert_eq!(error.to_string(), "Empty content for beach.jpg");
    }

    #[test]
    fn test_error_conversion() {
        let denied = AmazonError::Transfer(TransferError::PermissionDenied("quota".to_string()));
        assert!(matches!(
            TransferError::from(denied),
            TransferError::PermissionDenied(_)
        ));

        assert!(matches!(
            TransferError::from(AmazonError::CustomerNotRegistered),
            TransferError::Validation(_)
        ));

        let io = AmazonError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "eof"));
        assert!(matches!(
            TransferError::from(io),
            TransferError::TransientIo { .. }
        ));
    }
}
