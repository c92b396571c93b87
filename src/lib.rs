//! Workspace facade crate.
//!
//! Re-exports the shared transfer core and, behind feature flags, the
//! provider crates (`amazon`, `facebook`, `wordpress`). Host applications can
//! depend on `transfer-workspace` and pick providers without wiring each
//! crate individually. `desktop-shims` supplies the reqwest transport and the
//! filesystem job store as configuration defaults.

pub use core_runtime as runtime;
pub use core_transfer as transfer;

#[cfg(feature = "amazon")]
pub use provider_amazon as amazon;

#[cfg(feature = "facebook")]
pub use provider_facebook as facebook;

#[cfg(feature = "wordpress")]
pub use provider_wordpress as wordpress;
