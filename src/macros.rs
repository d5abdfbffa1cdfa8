/// Creates an [`Errata`](crate::Errata) holding one formatted note.
///
/// The first argument is the [`Severity`](crate::Severity); the rest are
/// interpreted like the arguments of [`format!()`]. The message is rendered
/// straight into the errata's storage without an intermediate `String`.
///
/// [`format!()`]: std::format
///
/// # Examples
///
/// ```
/// use errata::prelude::*;
///
/// let port = 70000;
/// let errata = errata!(Severity::Error, "port {port} is out of range");
/// assert_eq!(errata.front().text(), "port 70000 is out of range");
/// # errata.dismiss();
/// ```
#[macro_export]
macro_rules! errata {
    ($severity:expr, $($arg:tt)+) => {
        $crate::__private::format_errata($severity, $crate::__private::format_args!($($arg)+))
    };
}

/// Returns early with a one-note errata.
///
/// Expands to `return errata!(...).into();`, so it works in functions
/// returning [`Errata`](crate::Errata) or [`Rv<T>`](crate::Rv) (with
/// `T: Default`). The severity is optional and defaults to
/// [`Severity::Error`](crate::Severity::Error).
///
/// # Examples
///
/// ```
/// use errata::prelude::*;
///
/// fn checked_div(a: i32, b: i32) -> Rv<i32> {
///     if b == 0 {
///         bail!("cannot divide {a} by zero");
///     }
///     Rv::new(a / b)
/// }
///
/// fn validate(name: &str) -> Errata {
///     if name.is_empty() {
///         bail!(Severity::Warn, "empty name");
///     }
///     Errata::new()
/// }
///
/// assert_eq!(*checked_div(6, 3).value(), 2);
/// assert!(!checked_div(1, 0).is_ok());
/// assert_eq!(validate("").severity(), Severity::Warn);
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(, $($arg:tt)*)?) => {
        return $crate::errata!($crate::Severity::Error, $msg $(, $($arg)*)?).into()
    };
    ($severity:expr, $($arg:tt)+) => {
        return $crate::errata!($severity, $($arg)+).into()
    };
}
