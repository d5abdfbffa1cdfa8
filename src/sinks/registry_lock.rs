#[cfg(feature = "std")]
use std::sync as impl_;

#[cfg(not(feature = "std"))]
use spin as impl_;

/// A process-wide slot behind a reader-writer lock.
///
/// Uses `std::sync::RwLock` with the `std` feature and `spin::RwLock`
/// otherwise. The lock is never held while user code runs: readers copy out
/// what they need and writers only touch the slot itself.
#[repr(transparent)]
pub(crate) struct RegistryLock<T: 'static + Send + Sync>(impl_::RwLock<Option<T>>);

impl<T: 'static + Send + Sync> RegistryLock<T> {
    /// Creates an empty slot.
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self(impl_::RwLock::new(None))
    }

    /// Runs `f` on the contents of the slot under the read lock.
    #[inline]
    pub(crate) fn inspect<R>(&'static self, f: impl FnOnce(Option<&T>) -> R) -> R {
        #[cfg(not(feature = "std"))]
        let guard = self.0.read();

        // A poisoned slot is still consistent: writers never leave it half
        // updated.
        #[cfg(feature = "std")]
        let guard = self.0.read().unwrap_or_else(impl_::PoisonError::into_inner);

        f(guard.as_ref())
    }

    /// Runs `f` on the slot under the write lock.
    #[inline]
    pub(crate) fn update<R>(&'static self, f: impl FnOnce(&mut Option<T>) -> R) -> R {
        #[cfg(not(feature = "std"))]
        let mut guard = self.0.write();

        #[cfg(feature = "std")]
        let mut guard = self.0.write().unwrap_or_else(impl_::PoisonError::into_inner);

        f(&mut *guard)
    }
}
