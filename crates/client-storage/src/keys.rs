//! Storage key constants.

/// Storage keys used by the client auth layer.
pub struct StorageKeys;

impl StorageKeys {
    /// Session token pair plus expiry (JSON, durable store)
    pub const SESSION_TOKENS: &'static str = "session_tokens";

    /// Email of the in-progress password reset (ephemeral store)
    pub const RESET_FLOW_EMAIL: &'static str = "reset_flow_email";

    /// Verified one-time code of the in-progress password reset (ephemeral store)
    pub const RESET_FLOW_VERIFIED_OTP: &'static str = "reset_flow_verified_otp";
}
