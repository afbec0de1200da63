use thiserror::Error;

use homzhub_api::ApiError;
use homzhub_core::domain::lease::LeaseValidationFailure;
use homzhub_core::errors::DomainError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("upload failed for quote {quote_number} in `{group_name}`: {message}")]
    Upload { group_name: String, quote_number: u8, message: String },
    #[error("lease form validation failed: {failures:?}")]
    LeaseValidation { failures: Vec<LeaseValidationFailure> },
    #[error("workflow cancelled")]
    Cancelled,
}
