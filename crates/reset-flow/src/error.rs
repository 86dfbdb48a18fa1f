//! Reset flow errors.

use crate::flow_fsm::ResetStep;
use api_client::ApiError;
use client_storage::StorageError;
use thiserror::Error;

/// Error surfaced by the reset flow controller.
///
/// Validation variants carry the exact user-facing copy; some carry a
/// redirect target when the flow must resume at an earlier step.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Please enter your email address")]
    EmptyEmail,

    #[error("Please enter the verification code")]
    EmptyOtp,

    #[error("Please fill in both password fields")]
    EmptyPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    /// The stored email is gone; the flow must restart from the top
    #[error("Password reset session expired, please start over")]
    RestartRequired,

    /// No verified code is held; the user must re-verify
    #[error("Verification required, please re-enter your code")]
    OtpMissing,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl FlowError {
    /// The step the UI should navigate to, when this error demands one.
    pub fn redirect(&self) -> Option<ResetStep> {
        match self {
            FlowError::RestartRequired => Some(ResetStep::AwaitingEmail),
            FlowError::OtpMissing => Some(ResetStep::AwaitingOtp),
            _ => None,
        }
    }

    /// User-facing message. Always non-empty.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
