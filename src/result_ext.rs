use crate::{Errata, Rv, Severity};

mod sealed {
    pub trait Sealed {}
    impl<A, E> Sealed for Result<A, E> {}
}

/// Extension methods for moving a `Result`'s error into an errata.
///
/// # Examples
///
/// ```
/// use errata::prelude::*;
///
/// fn parse_all(items: &[&str]) -> Rv<Vec<u32>> {
///     let mut errata = Errata::new();
///     let values = items
///         .iter()
///         .filter_map(|item| item.parse::<u32>().note_err(&mut errata, Severity::Warn))
///         .collect();
///     Rv::from_parts(values, errata)
/// }
///
/// let (values, errata) = parse_all(&["1", "x", "3"]).into_parts();
/// assert_eq!(values, [1, 3]);
/// assert_eq!(errata.count(), 1);
/// # errata.dismiss();
/// ```
pub trait ResultExt<T, E>: sealed::Sealed {
    /// Converts into an [`Rv`]: `Ok(v)` becomes `v` with an empty errata, and
    /// `Err(e)` becomes the default value with `e` and its sources noted at
    /// [`Severity::Error`].
    #[track_caller]
    fn into_rv(self) -> Rv<T>
    where
        T: Default;

    /// Returns the value, or notes the error and its sources in `errata` at
    /// `severity` and returns `None`.
    ///
    /// # Panics
    ///
    /// Panics if the result is an error and `errata` is shared with another
    /// handle.
    #[track_caller]
    fn note_err(self, errata: &mut Errata, severity: Severity) -> Option<T>;
}

impl<T, E> ResultExt<T, E> for Result<T, E>
where
    E: core::error::Error,
{
    #[track_caller]
    fn into_rv(self) -> Rv<T>
    where
        T: Default,
    {
        match self {
            Ok(value) => Rv::new(value),
            Err(error) => {
                let mut errata = Errata::new();
                errata.note_error(Severity::Error, &error);
                Rv::from_errata(errata)
            }
        }
    }

    #[track_caller]
    fn note_err(self, errata: &mut Errata, severity: Severity) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                errata.note_error(severity, &error);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::num::ParseIntError;

    use super::*;

    fn parse(text: &str) -> Result<i64, ParseIntError> {
        text.parse()
    }

    #[test]
    fn test_into_rv() {
        let rv = parse("12").into_rv();
        assert!(rv.is_ok());
        assert_eq!(*rv.value(), 12);

        let rv = parse("twelve").into_rv();
        assert!(!rv.is_ok());
        let (value, errata) = rv.into_parts();
        assert_eq!(value, 0);
        assert_eq!(errata.front().text(), "invalid digit found in string");
        errata.dismiss();
    }

    #[test]
    fn test_note_err_collects() {
        let mut errata = Errata::new();
        let values: Vec<i64> = ["1", "", "3"]
            .into_iter()
            .filter_map(|text| parse(text).note_err(&mut errata, Severity::Info))
            .collect();

        assert_eq!(values, [1, 3]);
        assert!(errata.is_ok());
        assert_eq!(
            errata.front().text(),
            "cannot parse integer from empty string"
        );
        errata.dismiss();
    }
}
