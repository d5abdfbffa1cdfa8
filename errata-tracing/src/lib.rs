#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]

//! Forwards abandoned errata to [`tracing`] events.
//!
//! The core `errata` crate performs no I/O: errata nobody handled are given to
//! whatever [sinks](errata::sinks) the application registered. This crate
//! provides a sink that turns them into `tracing` events, so they show up
//! wherever the rest of the application's logs go.
//!
//! # Quick Start
//!
//! ```
//! use errata::{Errata, Severity};
//!
//! // Once, at startup, after setting up a tracing subscriber.
//! errata_tracing::install();
//!
//! // Somewhere deep inside the application.
//! let mut errata = Errata::new();
//! errata.warn("cache miss storm");
//! drop(errata); // abandoned: logged as a WARN event with target "errata"
//! ```
//!
//! # Levels
//!
//! | severity | level |
//! |---|---|
//! | [`Diag`](Severity::Diag) | `DEBUG` |
//! | [`Info`](Severity::Info) | `INFO` |
//! | [`Warn`](Severity::Warn) | `WARN` |
//! | [`Error`](Severity::Error) | `ERROR` |
//!
//! # Environment Variables
//!
//! - `ERRATA_TRACING` - Comma-separated options, read once:
//!   - `each` - Emit one event per note instead of one per errata
//!   - `min=<severity>` - Skip errata whose severity is below `<severity>`
//!     (for example `min=warn`)

use std::sync::OnceLock;

use errata::{Errata, ErrataRef, Rv, Severity, sinks::Sink};

/// The target of every event emitted by this crate.
pub const TARGET: &str = "errata";

/// Emits one event at the level matching `$severity`.
macro_rules! severity_event {
    ($severity:expr, $($rest:tt)+) => {
        match $severity {
            Severity::Diag => tracing::debug!(target: TARGET, $($rest)+),
            Severity::Info => tracing::info!(target: TARGET, $($rest)+),
            Severity::Warn => tracing::warn!(target: TARGET, $($rest)+),
            Severity::Error => tracing::error!(target: TARGET, $($rest)+),
        }
    };
}

#[derive(Debug)]
struct ErrataTracingEnvOptions {
    per_annotation: bool,
    min_severity: Severity,
}

impl ErrataTracingEnvOptions {
    fn get() -> &'static Self {
        static ERRATA_TRACING_FLAGS: OnceLock<ErrataTracingEnvOptions> = OnceLock::new();

        ERRATA_TRACING_FLAGS.get_or_init(|| match std::env::var_os("ERRATA_TRACING") {
            Some(var) => Self::parse(&var.to_string_lossy()),
            None => Self::parse(""),
        })
    }

    fn parse(options: &str) -> Self {
        let mut per_annotation = false;
        let mut min_severity = Severity::DEFAULT;

        for option in options.split(',').map(str::trim) {
            if option.eq_ignore_ascii_case("each") {
                per_annotation = true;
            } else if let Some(min) = option.strip_prefix("min=") {
                // Unknown severities are ignored rather than failing startup.
                if let Ok(severity) = min.parse() {
                    min_severity = severity;
                }
            }
        }

        ErrataTracingEnvOptions {
            per_annotation,
            min_severity,
        }
    }
}

/// A [`Sink`] that emits abandoned errata as `tracing` events.
///
/// By default each abandoned errata becomes one event at the level of its
/// severity, with target [`TARGET`], fields `severity` and `count`, and the
/// rendered notes as the message. In per-annotation mode every note becomes
/// an event of its own, with fields `severity` and `level`.
///
/// # Examples
///
/// ```
/// use errata::{Severity, sinks::SinkRegistry};
/// use errata_tracing::TracingSink;
///
/// let sink = TracingSink::new()
///     .min_severity(Severity::Warn)
///     .per_annotation(true);
/// let registry = SinkRegistry::new().register(sink);
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    per_annotation: bool,
    min_severity: Severity,
}

impl TracingSink {
    /// Creates a sink configured from the `ERRATA_TRACING` environment
    /// variable.
    pub fn new() -> Self {
        let env_options = ErrataTracingEnvOptions::get();
        Self {
            per_annotation: env_options.per_annotation,
            min_severity: env_options.min_severity,
        }
    }

    /// Skips abandoned errata whose severity is below `severity`.
    #[must_use]
    pub fn min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Emits one event per note instead of one per errata.
    #[must_use]
    pub fn per_annotation(mut self, enabled: bool) -> Self {
        self.per_annotation = enabled;
        self
    }

    /// Emits `errata` regardless of the minimum severity.
    pub fn emit(&self, errata: ErrataRef<'_>) {
        if errata.is_empty() {
            return;
        }

        if self.per_annotation {
            // Oldest first, so the events read in the order things happened.
            for note in errata.iter().rev() {
                severity_event!(
                    note.severity(),
                    severity = %note.severity(),
                    level = note.level(),
                    "{}",
                    note.text()
                );
            }
        } else {
            severity_event!(
                errata.severity(),
                severity = %errata.severity(),
                count = errata.count(),
                "{errata}"
            );
        }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for TracingSink {
    fn on_abandoned(&self, errata: ErrataRef<'_>) {
        if errata.severity() >= self.min_severity {
            self.emit(errata);
        }
    }
}

/// Registers a [`TracingSink::new`] in the process-wide sink registry.
#[track_caller]
pub fn install() {
    errata::sinks::register_sink(TracingSink::new());
}

/// Logs diagnostics right away instead of waiting for them to be abandoned.
///
/// The notes are emitted the same way [`TracingSink`] would emit them, and the
/// errata is then [dismissed](Errata::dismiss), so the sinks do not see it
/// again.
///
/// # Examples
///
/// ```
/// use errata::{Errata, Rv, Severity};
/// use errata_tracing::ErrataTracingExt;
///
/// let mut errata = Errata::new();
/// errata.info("configuration reloaded");
/// errata.log();
///
/// let rv = Rv::new(7);
/// let value: i32 = rv.log();
/// assert_eq!(value, 7);
/// ```
pub trait ErrataTracingExt {
    /// What is left after logging.
    type Output;

    /// Emits the notes as `tracing` events and marks them as handled.
    fn log(self) -> Self::Output;
}

impl ErrataTracingExt for Errata {
    type Output = ();

    fn log(self) -> Self::Output {
        TracingSink::new().emit(self.as_ref());
        self.dismiss();
    }
}

impl<T> ErrataTracingExt for Rv<T> {
    type Output = T;

    fn log(self) -> Self::Output {
        let (value, errata) = self.into_parts();
        errata.log();
        value
    }
}
