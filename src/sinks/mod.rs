//! Sinks for abandoned errata.
//!
//! An errata is *abandoned* when the last handle to it is dropped while it
//! still holds notes, that is, nobody [dismissed](crate::Errata::dismiss),
//! [cleared](crate::Errata::clear) or otherwise consumed it. Abandoned errata
//! are handed to every registered [`Sink`], in registration order, exactly
//! once, on the thread that dropped the last handle.
//!
//! Sinks are the only place this crate hands diagnostics to the outside
//! world; it performs no I/O itself. A typical application registers one sink
//! at startup that forwards to its logging system (see the `errata-tracing`
//! crate for a ready-made one).
//!
//! # Registering sinks
//!
//! Sinks can be added one at a time with [`register_sink`], or installed in
//! bulk at process start with [`install_sinks`]:
//!
//! ```
//! use errata::{
//!     ErrataRef,
//!     sinks::{SinkRegistry, install_sinks},
//! };
//!
//! let registry = SinkRegistry::new().register(|errata: ErrataRef<'_>| {
//!     eprintln!("unhandled diagnostics:\n{errata}");
//! });
//! install_sinks(registry).expect("sinks are installed once at startup");
//! ```
//!
//! # Nested abandonment
//!
//! Sinks run without any lock held, so a sink may register further sinks or
//! create and drop errata of its own. With the `std` feature, an errata
//! abandoned on a thread that is already running sinks is queued and
//! dispatched after the current dispatch finishes, so sinks never run
//! re-entrantly. Without `std`, such an errata is dispatched immediately.

use alloc::vec::Vec;
use core::{fmt, panic::Location};

use triomphe::Arc;
use unsize::CoerceUnsize;

use crate::ErrataRef;

mod dispatch;
mod registry_lock;

pub(crate) use self::dispatch::abandon;
use self::registry_lock::RegistryLock;

static SINKS: RegistryLock<SinkRegistry> = RegistryLock::new();

/// A receiver of abandoned errata.
///
/// Implemented for every `Fn(ErrataRef<'_>) + Send + Sync + 'static`, so a
/// closure is usually all that is needed.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use errata::{ErrataRef, sinks::Sink};
///
/// struct CountingSink(AtomicUsize);
///
/// impl Sink for CountingSink {
///     fn on_abandoned(&self, errata: ErrataRef<'_>) {
///         self.0.fetch_add(errata.count(), Ordering::Relaxed);
///     }
/// }
/// ```
pub trait Sink: 'static + Send + Sync {
    /// Called once for each abandoned errata.
    ///
    /// The view is only valid for the duration of the call; copy out any text
    /// that must be kept.
    fn on_abandoned(&self, errata: ErrataRef<'_>);
}

impl<F> Sink for F
where
    F: Fn(ErrataRef<'_>) + 'static + Send + Sync,
{
    fn on_abandoned(&self, errata: ErrataRef<'_>) {
        (self)(errata)
    }
}

/// Type-erased sink that also knows where it was registered.
trait UntypedSink: 'static + Send + Sync + fmt::Display {
    /// Forwards to [`Sink::on_abandoned`].
    fn on_abandoned(&self, errata: ErrataRef<'_>);
}

#[track_caller]
fn sink_to_untyped<S: Sink>(sink: S) -> Arc<dyn UntypedSink> {
    struct Registered<S> {
        sink: S,
        added_at: &'static Location<'static>,
    }

    impl<S> fmt::Display for Registered<S> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "Sink {} registered at {}:{}",
                core::any::type_name::<S>(),
                self.added_at.file(),
                self.added_at.line()
            )
        }
    }

    impl<S: Sink> UntypedSink for Registered<S> {
        fn on_abandoned(&self, errata: ErrataRef<'_>) {
            self.sink.on_abandoned(errata);
        }
    }

    let sink = Registered {
        sink,
        added_at: Location::caller(),
    };
    Arc::new(sink).unsize(unsize::Coercion!(to dyn UntypedSink))
}

/// An ordered list of sinks.
///
/// A registry is a plain value: it can be built up front and installed as the
/// process-wide registry with [`install_sinks`], or used directly to dispatch
/// errata in tests and embedded setups. Cloning a registry is cheap; the sinks
/// themselves are shared.
///
/// # Examples
///
/// ```
/// use std::sync::{
///     Arc,
///     atomic::{AtomicUsize, Ordering},
/// };
///
/// use errata::{Errata, ErrataRef, sinks::SinkRegistry};
///
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&seen);
/// let registry = SinkRegistry::new().register(move |errata: ErrataRef<'_>| {
///     counter.fetch_add(errata.count(), Ordering::Relaxed);
/// });
///
/// let mut errata = Errata::new();
/// errata.error("lost");
/// registry.dispatch(errata.as_ref());
/// assert_eq!(seen.load(Ordering::Relaxed), 1);
/// # errata.dismiss();
/// ```
#[derive(Clone, Default)]
pub struct SinkRegistry {
    /// Sinks in registration order.
    sinks: Vec<Arc<dyn UntypedSink>>,
}

impl SinkRegistry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Appends `sink`, remembering the caller's location for diagnostics.
    #[track_caller]
    #[must_use]
    pub fn register<S: Sink>(mut self, sink: S) -> Self {
        self.sinks.push(sink_to_untyped(sink));
        self
    }

    /// Number of sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Returns `true` if the registry holds no sinks.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Calls every sink with `errata`, in registration order.
    pub fn dispatch(&self, errata: ErrataRef<'_>) {
        for sink in &self.sinks {
            UntypedSink::on_abandoned(&**sink, errata);
        }
    }
}

impl fmt::Debug for SinkRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        /// Shows a sink through its `Display` description.
        struct Description<'a>(&'a dyn UntypedSink);

        impl fmt::Debug for Description<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self.0, f)
            }
        }

        f.debug_list()
            .entries(self.sinks.iter().map(|sink| Description(&**sink)))
            .finish()
    }
}

/// Error returned by [`install_sinks`] when sinks are already registered.
///
/// Holds the registry that could not be installed.
pub struct SinksAlreadyInstalledError(pub SinkRegistry);

impl fmt::Debug for SinksAlreadyInstalledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinksAlreadyInstalledError").finish()
    }
}

impl fmt::Display for SinksAlreadyInstalledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "errata sinks are already installed globally")
    }
}

impl core::error::Error for SinksAlreadyInstalledError {}

/// Adds `sink` to the process-wide registry.
///
/// Sinks can only be added, never removed. The caller's location is recorded
/// and shows up in the registry's `Debug` output.
///
/// # Examples
///
/// ```
/// use errata::{ErrataRef, sinks::register_sink};
///
/// register_sink(|errata: ErrataRef<'_>| eprintln!("{errata}"));
/// ```
#[track_caller]
pub fn register_sink<S: Sink>(sink: S) {
    let sink = sink_to_untyped(sink);
    SINKS.update(|slot| slot.get_or_insert_with(SinkRegistry::new).sinks.push(sink));
}

/// Installs `registry` as the process-wide registry.
///
/// Intended to be called once at startup. Fails, handing the registry back,
/// if any sink has already been registered.
pub fn install_sinks(registry: SinkRegistry) -> Result<(), SinksAlreadyInstalledError> {
    SINKS.update(|slot| {
        if slot.as_ref().is_some_and(|installed| !installed.is_empty()) {
            return Err(SinksAlreadyInstalledError(registry));
        }
        *slot = Some(registry);
        Ok(())
    })
}

/// Number of sinks in the process-wide registry.
pub fn registered_sink_count() -> usize {
    SINKS.inspect(|slot| slot.map_or(0, SinkRegistry::len))
}

/// Copies the process-wide registry so it can be used without the lock held.
///
/// Returns `None` when no sink is registered.
fn snapshot() -> Option<SinkRegistry> {
    SINKS.inspect(|slot| slot.filter(|registry| !registry.is_empty()).cloned())
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{Errata, Severity};

    #[test]
    fn test_registry_dispatches_in_order() {
        static ORDER: AtomicUsize = AtomicUsize::new(0);
        static FIRST: AtomicUsize = AtomicUsize::new(0);
        static SECOND: AtomicUsize = AtomicUsize::new(0);

        let registry = SinkRegistry::new()
            .register(|_: ErrataRef<'_>| {
                FIRST.store(ORDER.fetch_add(1, Ordering::SeqCst) + 1, Ordering::SeqCst);
            })
            .register(|_: ErrataRef<'_>| {
                SECOND.store(ORDER.fetch_add(1, Ordering::SeqCst) + 1, Ordering::SeqCst);
            });
        assert_eq!(registry.len(), 2);

        let mut errata = Errata::new();
        errata.note(Severity::Info, "x");
        registry.dispatch(errata.as_ref());
        errata.dismiss();

        assert_eq!(FIRST.load(Ordering::SeqCst), 1);
        assert_eq!(SECOND.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_registry_debug_shows_location() {
        let registry = SinkRegistry::new().register(|_: ErrataRef<'_>| {});
        let debug = format!("{registry:?}");
        assert!(debug.contains("registered at"));
        assert!(debug.contains(file!()));
    }

    #[test]
    fn test_empty_registry() {
        let registry = SinkRegistry::default();
        assert!(registry.is_empty());
        registry.dispatch(ErrataRef::empty());
        assert_eq!(format!("{registry:?}"), "[]");
    }

    #[test]
    fn test_error_display() {
        let error = SinksAlreadyInstalledError(SinkRegistry::new());
        assert_eq!(format!("{error}"), "errata sinks are already installed globally");
        assert_eq!(format!("{error:?}"), "SinksAlreadyInstalledError");
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_impl_all!(SinkRegistry: Send, Sync, Clone);
        static_assertions::assert_impl_all!(SinksAlreadyInstalledError: Send, Sync);
    }
}
