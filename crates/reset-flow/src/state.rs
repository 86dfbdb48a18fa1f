//! Persisted reset flow context.

use crate::flow_fsm::{ResetMachine, ResetMachineState, ResetStep};
use client_storage::{StateStore, StorageKeys, StorageResult};
use std::sync::Arc;

/// Snapshot of the stored flow context.
///
/// The context, not the caller, decides which step the flow is on: a step
/// is only reachable when every earlier step has left its mark here.
#[derive(Debug, Clone, Default)]
pub struct ResetFlowState {
    pub email: Option<String>,
    pub verified_otp: Option<String>,
}

impl ResetFlowState {
    /// The furthest step the stored context supports.
    pub fn resolved_step(&self) -> ResetStep {
        if self.email.is_none() {
            ResetStep::AwaitingEmail
        } else if self.verified_otp.is_none() {
            ResetStep::AwaitingOtp
        } else {
            ResetStep::AwaitingNewPassword
        }
    }

    /// A state machine positioned at the resolved step.
    pub fn machine(&self) -> ResetMachine {
        let state = match self.resolved_step() {
            ResetStep::AwaitingEmail => ResetMachineState::AwaitingEmail,
            ResetStep::AwaitingOtp => ResetMachineState::AwaitingOtp,
            ResetStep::AwaitingNewPassword => ResetMachineState::AwaitingNewPassword,
            ResetStep::Complete => ResetMachineState::Complete,
        };
        ResetMachine::from_state(state)
    }
}

/// Storage wrapper for the flow context.
#[derive(Clone)]
pub struct ResetFlowStore {
    store: Arc<dyn StateStore>,
}

impl ResetFlowStore {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> StorageResult<ResetFlowState> {
        Ok(ResetFlowState {
            email: self.store.get(StorageKeys::RESET_FLOW_EMAIL)?,
            verified_otp: self.store.get(StorageKeys::RESET_FLOW_VERIFIED_OTP)?,
        })
    }

    pub fn email(&self) -> StorageResult<Option<String>> {
        self.store.get(StorageKeys::RESET_FLOW_EMAIL)
    }

    pub fn set_email(&self, email: &str) -> StorageResult<()> {
        self.store.set(StorageKeys::RESET_FLOW_EMAIL, email)
    }

    pub fn set_verified_otp(&self, otp: &str) -> StorageResult<()> {
        self.store.set(StorageKeys::RESET_FLOW_VERIFIED_OTP, otp)
    }

    pub fn clear_verified_otp(&self) -> StorageResult<()> {
        self.store.delete(StorageKeys::RESET_FLOW_VERIFIED_OTP)?;
        Ok(())
    }

    /// Drop all flow context.
    pub fn clear(&self) -> StorageResult<()> {
        self.store.delete(StorageKeys::RESET_FLOW_EMAIL)?;
        self.store.delete(StorageKeys::RESET_FLOW_VERIFIED_OTP)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_storage::create_ephemeral_store;

    #[test]
    fn test_empty_context_resolves_to_email_step() {
        let state = ResetFlowState::default();
        assert_eq!(state.resolved_step(), ResetStep::AwaitingEmail);
    }

    #[test]
    fn test_email_only_resolves_to_otp_step() {
        let state = ResetFlowState {
            email: Some("a@b.co".to_string()),
            verified_otp: None,
        };
        assert_eq!(state.resolved_step(), ResetStep::AwaitingOtp);
    }

    #[test]
    fn test_full_context_resolves_to_password_step() {
        let state = ResetFlowState {
            email: Some("a@b.co".to_string()),
            verified_otp: Some("123456".to_string()),
        };
        assert_eq!(state.resolved_step(), ResetStep::AwaitingNewPassword);
    }

    #[test]
    fn test_otp_without_email_resolves_to_email_step() {
        // Email is the earliest unmet requirement even when an OTP is held
        let state = ResetFlowState {
            email: None,
            verified_otp: Some("123456".to_string()),
        };
        assert_eq!(state.resolved_step(), ResetStep::AwaitingEmail);
    }

    #[test]
    fn test_store_roundtrip_and_clear() {
        let flow = ResetFlowStore::new(create_ephemeral_store());

        flow.set_email("a@b.co").unwrap();
        flow.set_verified_otp("123456").unwrap();

        let state = flow.load().unwrap();
        assert_eq!(state.email.as_deref(), Some("a@b.co"));
        assert_eq!(state.verified_otp.as_deref(), Some("123456"));

        flow.clear().unwrap();
        let state = flow.load().unwrap();
        assert_eq!(state.email, None);
        assert_eq!(state.verified_otp, None);
    }

    #[test]
    fn test_clear_verified_otp_keeps_email() {
        let flow = ResetFlowStore::new(create_ephemeral_store());
        flow.set_email("a@b.co").unwrap();
        flow.set_verified_otp("123456").unwrap();

        flow.clear_verified_otp().unwrap();
        let state = flow.load().unwrap();
        assert_eq!(state.email.as_deref(), Some("a@b.co"));
        assert_eq!(state.verified_otp, None);
    }
}
