//! HTTP request layer for the Meridian backend API.
//!
//! This crate provides:
//! - `ApiClient`: bearer-token injection and `{data: ...}` envelope
//!   unwrapping over reqwest
//! - `ApiError`: the one canonical error shape all call sites consume
//! - Normalization of the backend's inconsistent error payload shapes

mod client;
mod error;
mod normalize;

pub use client::{AccessTokenProvider, ApiClient};
pub use error::{ApiError, ApiResult};
pub use normalize::normalize_error_message;

pub use reqwest::Method;
