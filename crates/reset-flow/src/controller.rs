//! Three-step password reset controller.

use crate::error::FlowError;
use crate::flow_fsm::{ResetMachine, ResetMachineInput, ResetMachineState, ResetStep};
use crate::state::ResetFlowStore;
use api_client::{ApiClient, ApiError};
use auth_session::{SessionBridge, SessionGrant, TokenVault};
use client_storage::StateStore;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

const FORGOT_PASSWORD_ENDPOINT: &str = "/api/v1/auth/forgot-password";
const VERIFY_RESET_PASSWORD_ENDPOINT: &str = "/api/v1/auth/verify-reset-password";

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    #[allow(dead_code)]
    message: Option<String>,
}

/// Outcome of a completed reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetCompletion {
    /// Credentials were handed to the session bridge; the user is signed in
    SignedIn,
    /// The password changed but the bridge failed; the user logs in manually
    ManualLoginRequired,
}

/// Drives the email / OTP / new-password reset sequence.
///
/// Step order is enforced by the stored context, not the caller: each
/// operation re-derives its prerequisites from storage, so a stale or
/// out-of-order UI can never send a half-formed request.
pub struct ResetFlowController {
    api: ApiClient,
    vault: TokenVault,
    flow: ResetFlowStore,
    bridge: Arc<dyn SessionBridge>,
}

impl ResetFlowController {
    pub fn new(
        api: ApiClient,
        vault: TokenVault,
        store: Arc<dyn StateStore>,
        bridge: Arc<dyn SessionBridge>,
    ) -> Self {
        Self {
            api,
            vault,
            flow: ResetFlowStore::new(store),
            bridge,
        }
    }

    /// Check whether the flow may enter `step`.
    ///
    /// Returns the earliest unmet step when the stored context does not
    /// support the requested one, `None` when entry is allowed.
    pub fn entry_guard(&self, step: ResetStep) -> Result<Option<ResetStep>, FlowError> {
        let machine = self.flow.load()?.machine();
        let resolved = ResetStep::from(machine.state());
        if step.rank() > resolved.rank() {
            debug!(requested = ?step, resolved = ?resolved, "Redirecting to earlier reset step");
            Ok(Some(resolved))
        } else {
            Ok(None)
        }
    }

    /// Step 1: request a reset code for `email`.
    ///
    /// On success the email is remembered and any previously verified code
    /// is dropped, since the backend has issued a new one.
    pub async fn request_reset(&self, email: &str) -> Result<ResetStep, FlowError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(FlowError::EmptyEmail);
        }

        let _ack: MessageResponse = self
            .api
            .post(FORGOT_PASSWORD_ENDPOINT, &json!({ "email": email }))
            .await?;

        self.flow.set_email(email)?;
        self.flow.clear_verified_otp()?;
        info!("Reset code requested");
        Ok(ResetStep::AwaitingOtp)
    }

    /// Step 2: verify the emailed code.
    pub async fn verify_otp(&self, code: &str) -> Result<ResetStep, FlowError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(FlowError::EmptyOtp);
        }

        if self.flow.email()?.is_none() {
            return Err(FlowError::RestartRequired);
        }

        // Token-check variant of the verify endpoint
        let _ack: MessageResponse = self
            .api
            .post(VERIFY_RESET_PASSWORD_ENDPOINT, &json!({ "token": code }))
            .await?;

        self.flow.set_verified_otp(code)?;
        info!("Reset code verified");
        Ok(ResetStep::AwaitingNewPassword)
    }

    /// Step 3: set the new password and complete the flow.
    ///
    /// Validations run in a fixed order before any network traffic:
    /// stored email, both fields filled, fields equal, minimum length,
    /// verified code present.
    pub async fn confirm_reset(
        &self,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<ResetCompletion, FlowError> {
        let state = self.flow.load()?;

        let email = state.email.ok_or(FlowError::RestartRequired)?;
        if new_password.is_empty() || confirm_password.is_empty() {
            return Err(FlowError::EmptyPassword);
        }
        if new_password != confirm_password {
            return Err(FlowError::PasswordMismatch);
        }
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FlowError::PasswordTooShort);
        }
        let otp = state.verified_otp.ok_or(FlowError::OtpMissing)?;

        let response: Result<SessionGrant, ApiError> = self
            .api
            .post(
                VERIFY_RESET_PASSWORD_ENDPOINT,
                &json!({
                    "email": email,
                    "otp_code": otp,
                    "new_password": new_password,
                }),
            )
            .await;

        match response {
            Ok(grant) => self.complete(grant),
            Err(error) => Err(self.confirm_failed(error)),
        }
    }

    fn complete(&self, grant: SessionGrant) -> Result<ResetCompletion, FlowError> {
        let mut machine = ResetMachine::from_state(ResetMachineState::AwaitingNewPassword);
        let _ = machine.consume(&ResetMachineInput::ResetConfirmed);
        info!("Password reset confirmed");

        // The flow is over whatever happens next
        self.flow.clear()?;

        if let Err(error) = self.vault.store_grant(&grant) {
            warn!(error = %error, "Failed to persist session tokens after reset");
        }

        match self.bridge.establish_session(&grant) {
            Ok(()) => Ok(ResetCompletion::SignedIn),
            Err(error) => {
                warn!(error = %error, "Session bridge failed after reset");
                Ok(ResetCompletion::ManualLoginRequired)
            }
        }
    }

    /// A backend rejection invalidates the code but keeps the email; a
    /// network failure keeps everything for a clean retry.
    fn confirm_failed(&self, error: ApiError) -> FlowError {
        match &error {
            ApiError::Backend { .. } => {
                let mut machine =
                    ResetMachine::from_state(ResetMachineState::AwaitingNewPassword);
                let _ = machine.consume(&ResetMachineInput::OtpRejected);
                debug!(step = ?ResetStep::from(machine.state()), "Reset rejected, code invalidated");

                if let Err(storage_error) = self.flow.clear_verified_otp() {
                    warn!(error = %storage_error, "Failed to clear verification code");
                }
            }
            _ => {
                debug!("Reset confirmation never reached the backend, keeping flow state");
            }
        }
        FlowError::Api(error)
    }
}
