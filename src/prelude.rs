//! Commonly used items for convenient importing.
//!
//! ```rust
//! use errata::prelude::*;
//!
//! fn lookup(key: &str) -> Rv<u32> {
//!     if key != "answer" {
//!         bail!(Severity::Warn, "unknown key {key:?}");
//!     }
//!     Rv::new(42)
//! }
//!
//! assert_eq!(*lookup("answer").value(), 42);
//! ```
//!
//! # What's Included
//!
//! - **[`Errata`]**, **[`Rv`]** and **[`Severity`]**
//! - **[`ResultExt`]**: moving `Result` errors into an errata
//! - **[`errata!`]** and **[`bail!`]**
//! - **[`IntoErrata`]** and **[`IntoAnyhow`]** with the `compat-anyhow1`
//!   feature
//!
//! [`IntoErrata`]: crate::compat::IntoErrata
//! [`IntoAnyhow`]: crate::compat::anyhow1::IntoAnyhow

#[cfg(feature = "compat-anyhow1")]
pub use crate::compat::{IntoErrata, anyhow1::IntoAnyhow};
pub use crate::{Errata, ErrataRef, ResultExt, Rv, Severity, bail, errata};
