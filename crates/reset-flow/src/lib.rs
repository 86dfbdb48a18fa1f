//! Three-step password reset flow for the Meridian client.
//!
//! The flow runs email -> OTP -> new password, with the stored context as
//! the single source of truth for step order. Completing the flow hands
//! the issued credentials to the session layer and signs the user in.

mod controller;
mod error;
mod flow_fsm;
mod state;

pub use controller::{ResetCompletion, ResetFlowController, MIN_PASSWORD_LEN};
pub use error::FlowError;
pub use flow_fsm::{ResetMachine, ResetMachineInput, ResetMachineState, ResetStep};
pub use state::{ResetFlowState, ResetFlowStore};
