//! Password reset state machine using rust-fsm.
//!
//! The three-step reset flow is an explicit finite state machine rather
//! than ad-hoc flags, so out-of-order entry always resolves to a defined
//! earlier step.
//!
//! ## State Diagram
//!
//! ```text
//! ┌────────────────────┐
//! │   AwaitingEmail    │ (initial)
//! └─────────┬──────────┘
//!           │ ResetRequested
//!           ▼
//! ┌────────────────────┐
//! │    AwaitingOtp     │ ◄──── OtpRejected / MissingOtp
//! └─────────┬──────────┘                │
//!           │ OtpVerified               │
//!           ▼                           │
//! ┌────────────────────┐ ──────────────┘
//! │ AwaitingNewPassword│
//! └─────────┬──────────┘
//!           │ ResetConfirmed
//!           ▼
//!       Complete
//!
//! MissingEmail from any mid-flow state returns to AwaitingEmail.
//! ```

use rust_fsm::*;
use serde::{Deserialize, Serialize};

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub reset_machine(AwaitingEmail)

    AwaitingEmail => {
        ResetRequested => AwaitingOtp
    },
    AwaitingOtp => {
        OtpVerified => AwaitingNewPassword,
        MissingEmail => AwaitingEmail
    },
    AwaitingNewPassword => {
        ResetConfirmed => Complete,
        // A rejected or lost verification code sends the user back one step
        OtpRejected => AwaitingOtp,
        MissingOtp => AwaitingOtp,
        MissingEmail => AwaitingEmail
    }
}

// Re-export the generated types with clearer names
pub use reset_machine::Input as ResetMachineInput;
pub use reset_machine::State as ResetMachineState;
pub use reset_machine::StateMachine as ResetMachine;

/// User-facing step of the reset flow, for navigation and redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetStep {
    AwaitingEmail,
    AwaitingOtp,
    AwaitingNewPassword,
    Complete,
}

impl ResetStep {
    /// Position in the flow, used to decide whether a requested step is
    /// ahead of what the stored context supports.
    pub fn rank(&self) -> u8 {
        match self {
            ResetStep::AwaitingEmail => 0,
            ResetStep::AwaitingOtp => 1,
            ResetStep::AwaitingNewPassword => 2,
            ResetStep::Complete => 3,
        }
    }
}

impl From<&ResetMachineState> for ResetStep {
    fn from(state: &ResetMachineState) -> Self {
        match state {
            ResetMachineState::AwaitingEmail => ResetStep::AwaitingEmail,
            ResetMachineState::AwaitingOtp => ResetStep::AwaitingOtp,
            ResetMachineState::AwaitingNewPassword => ResetStep::AwaitingNewPassword,
            ResetMachineState::Complete => ResetStep::Complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_awaiting_email() {
        let machine = ResetMachine::new();
        assert_eq!(*machine.state(), ResetMachineState::AwaitingEmail);
    }

    #[test]
    fn test_happy_path() {
        let mut machine = ResetMachine::new();

        machine
            .consume(&ResetMachineInput::ResetRequested)
            .unwrap();
        assert_eq!(*machine.state(), ResetMachineState::AwaitingOtp);

        machine.consume(&ResetMachineInput::OtpVerified).unwrap();
        assert_eq!(*machine.state(), ResetMachineState::AwaitingNewPassword);

        machine.consume(&ResetMachineInput::ResetConfirmed).unwrap();
        assert_eq!(*machine.state(), ResetMachineState::Complete);
    }

    #[test]
    fn test_rejected_otp_returns_to_otp_step() {
        let mut machine = ResetMachine::from_state(ResetMachineState::AwaitingNewPassword);

        machine.consume(&ResetMachineInput::OtpRejected).unwrap();
        assert_eq!(*machine.state(), ResetMachineState::AwaitingOtp);
    }

    #[test]
    fn test_missing_email_restarts_flow() {
        let mut machine = ResetMachine::from_state(ResetMachineState::AwaitingNewPassword);

        machine.consume(&ResetMachineInput::MissingEmail).unwrap();
        assert_eq!(*machine.state(), ResetMachineState::AwaitingEmail);
    }

    #[test]
    fn test_cannot_skip_ahead() {
        let mut machine = ResetMachine::new();

        assert!(machine.consume(&ResetMachineInput::OtpVerified).is_err());
        assert!(machine
            .consume(&ResetMachineInput::ResetConfirmed)
            .is_err());
        assert_eq!(*machine.state(), ResetMachineState::AwaitingEmail);
    }

    #[test]
    fn test_complete_is_terminal() {
        let mut machine = ResetMachine::from_state(ResetMachineState::Complete);

        assert!(machine.consume(&ResetMachineInput::ResetRequested).is_err());
        assert_eq!(*machine.state(), ResetMachineState::Complete);
    }

    #[test]
    fn test_step_ranks_are_ordered() {
        assert!(ResetStep::AwaitingEmail.rank() < ResetStep::AwaitingOtp.rank());
        assert!(ResetStep::AwaitingOtp.rank() < ResetStep::AwaitingNewPassword.rank());
        assert!(ResetStep::AwaitingNewPassword.rank() < ResetStep::Complete.rank());
    }

    #[test]
    fn test_step_serializes_snake_case() {
        let json = serde_json::to_string(&ResetStep::AwaitingNewPassword).unwrap();
        assert_eq!(json, "\"awaiting_new_password\"");
    }
}
