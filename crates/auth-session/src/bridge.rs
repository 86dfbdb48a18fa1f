//! Seam between credential acquisition and session establishment.

use crate::grant::SessionGrant;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Session bridge error: {0}")]
pub struct SessionBridgeError(pub String);

/// Hands freshly issued credentials to whatever owns the live session
/// (UI state, daemon connection, etc). A failing bridge never invalidates
/// the credentials themselves; callers degrade to manual login.
pub trait SessionBridge: Send + Sync {
    fn establish_session(&self, grant: &SessionGrant) -> Result<(), SessionBridgeError>;
}
