//! Integration with the [`anyhow`] 1.x error handling library.
//!
//! # From anyhow
//!
//! [`IntoErrata`] turns an [`anyhow::Error`] into an [`Errata`] with one
//! [`Error`](Severity::Error) note per cause, and an [`anyhow::Result<T>`]
//! into an [`Rv<T>`]:
//!
//! ```
//! use errata::prelude::*;
//!
//! let error = anyhow::anyhow!("disk full").context("saving snapshot");
//! let errata = error.into_errata();
//!
//! let texts: Vec<&str> = errata.iter().map(|note| note.text()).collect();
//! assert_eq!(texts, ["saving snapshot", "disk full"]);
//! # errata.dismiss();
//! ```
//!
//! # To anyhow
//!
//! [`IntoAnyhow`] renders an [`Errata`] into the message of an
//! [`anyhow::Error`] and dismisses it. An [`Rv<T>`] becomes `Ok(value)` when
//! its errata is ok and `Err(..)` otherwise:
//!
//! ```
//! use errata::prelude::*;
//!
//! fn checked(value: i32) -> Rv<i32> {
//!     if value < 0 {
//!         bail!("negative value {value}");
//!     }
//!     Rv::new(value)
//! }
//!
//! fn uses_anyhow() -> anyhow::Result<i32> {
//!     let value = checked(-1).into_anyhow()?;
//!     Ok(value)
//! }
//!
//! let error = uses_anyhow().unwrap_err();
//! assert_eq!(error.to_string(), "[error] negative value -1");
//! ```

use alloc::string::ToString;

use crate::{Errata, Rv, Severity, compat::IntoErrata};

impl IntoErrata for anyhow::Error {
    type Output = Errata;

    fn into_errata(self) -> Self::Output {
        let mut errata = Errata::new();
        for cause in self.chain().rev() {
            errata.note_fmt(Severity::Error, cause);
        }
        errata
    }
}

impl<T: Default> IntoErrata for anyhow::Result<T> {
    type Output = Rv<T>;

    fn into_errata(self) -> Self::Output {
        match self {
            Ok(value) => Rv::new(value),
            Err(error) => Rv::from_errata(error.into_errata()),
        }
    }
}

/// Converts errata into [`anyhow`] types.
///
/// The errata is rendered with the default formatter and then
/// [dismissed](Errata::dismiss): the resulting anyhow error now carries the
/// diagnostics, so they are not also handed to the sinks.
pub trait IntoAnyhow {
    /// The type produced by the conversion.
    ///
    /// - For [`Errata`]: [`anyhow::Error`]
    /// - For [`Rv<T>`]: [`anyhow::Result<T>`]
    type Output;

    /// Performs the conversion.
    fn into_anyhow(self) -> Self::Output;
}

impl IntoAnyhow for Errata {
    type Output = anyhow::Error;

    fn into_anyhow(self) -> Self::Output {
        let error = anyhow::Error::msg(self.to_string());
        self.dismiss();
        error
    }
}

impl<T> IntoAnyhow for Rv<T> {
    type Output = anyhow::Result<T>;

    fn into_anyhow(self) -> Self::Output {
        let (value, errata) = self.into_parts();
        if errata.is_ok() {
            errata.dismiss();
            Ok(value)
        } else {
            Err(errata.into_anyhow())
        }
    }
}
