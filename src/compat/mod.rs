//! Interoperability with other error handling libraries.
//!
//! # Available Integrations
//!
//! - [`anyhow1`] - Conversions to and from `anyhow` 1.x (requires the
//!   `compat-anyhow1` feature flag)
//!
//! Conversions in both directions are lossy in the same way: an errata is
//! rendered to text when it becomes a foreign error, and a foreign error
//! becomes one note per error in its source chain.
//!
//! # Example
//!
//! ```
//! use errata::prelude::*;
//!
//! # #[cfg(feature = "compat-anyhow1")] {
//! fn legacy() -> anyhow::Result<u16> {
//!     anyhow::bail!("legacy lookup failed");
//! }
//!
//! let rv: Rv<u16> = legacy().into_errata();
//! assert!(!rv.is_ok());
//! # rv.into_errata().dismiss();
//! # }
//! ```

/// Converts a foreign error type into an [`Errata`](crate::Errata).
///
/// Implemented by the compatibility modules:
/// - [`anyhow1`] implements it for `anyhow::Error` (producing an
///   [`Errata`](crate::Errata)) and `anyhow::Result<T>` (producing an
///   [`Rv<T>`](crate::Rv)).
pub trait IntoErrata {
    /// The type produced by the conversion.
    type Output;

    /// Performs the conversion.
    ///
    /// Errors are noted at [`Severity::Error`](crate::Severity::Error), one
    /// note per error in the source chain, outermost on top.
    fn into_errata(self) -> Self::Output;
}

#[cfg(feature = "compat-anyhow1")]
#[cfg_attr(docsrs, doc(cfg(feature = "compat-anyhow1")))]
pub mod anyhow1;
