//! # Authentication Module
//!
//! Bearer credentials for delegated-authorization transfer jobs.
//!
//! ## Overview
//!
//! A job is authorized once, out of band. The resulting
//! [`TokensAndUrlAuthData`] and the service's [`AppCredentials`] become a
//! [`Credential`], which a [`CredentialManager`] owns for the lifetime of the
//! job and refreshes on demand.
//!
//! ## Features
//!
//! - OAuth 2.0 refresh-token grant with client parameters in the form body
//! - `invalid_grant` surfaced as an unrecoverable [`AuthError::InvalidToken`]
//! - Single-flight refresh across concurrent requests
//! - Credentials and auth data never print secrets through `Debug`

pub mod credential;
pub mod error;
pub mod types;

pub use credential::CredentialManager;
pub use error::{AuthError, Result};
pub use types::{AppCredentials, Credential, TokensAndUrlAuthData};
