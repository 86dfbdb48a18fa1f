//! Session token lifecycle for the Meridian client.
//!
//! This crate owns the token pair (access + refresh), its persistence,
//! expiry tracking, and the single-flight refresh path. It also defines
//! the [`SessionBridge`] seam through which a completed password reset
//! hands its credentials to the rest of the application.

mod authorized;
mod bridge;
mod grant;
mod vault;

pub use authorized::AuthorizedApi;
pub use bridge::{SessionBridge, SessionBridgeError};
pub use grant::{SessionGrant, TokenRecord};
pub use vault::TokenVault;
