use errata_internals::ErrataData;

use crate::ErrataRef;

/// Hands the payload of an abandoned errata to the registered sinks.
///
/// Called from the drop of the last handle. The payload may be moved out;
/// the caller releases whatever is left.
pub(crate) fn abandon(data: &mut ErrataData) {
    #[cfg(feature = "std")]
    deferred::abandon(data);

    #[cfg(not(feature = "std"))]
    dispatch_now(data);
}

/// Runs every registered sink on `data`.
fn dispatch_now(data: &ErrataData) {
    if let Some(registry) = super::snapshot() {
        registry.dispatch(ErrataRef::new(Some(data)));
    }
}

#[cfg(feature = "std")]
mod deferred {
    use alloc::collections::VecDeque;
    use core::cell::{Cell, RefCell};

    use errata_internals::ErrataData;

    std::thread_local! {
        static DISPATCHING: Cell<bool> = const { Cell::new(false) };
        static PENDING: RefCell<VecDeque<ErrataData>> = const { RefCell::new(VecDeque::new()) };
    }

    /// Ends the outermost dispatch on this thread: dispatches everything
    /// queued by nested abandonment, then clears the dispatching flag.
    ///
    /// Runs on unwind as well, so a panicking sink does not strand the
    /// errata it abandoned.
    struct DispatchGuard;

    impl Drop for DispatchGuard {
        fn drop(&mut self) {
            while let Some(next) = pop_pending() {
                super::dispatch_now(&next);
            }
            let _ = DISPATCHING.try_with(|flag| flag.set(false));
        }
    }

    pub(super) fn abandon(data: &mut ErrataData) {
        // Thread-locals may already be gone during thread teardown; fall back
        // to dispatching inline.
        let Ok(nested) = DISPATCHING.try_with(|flag| flag.replace(true)) else {
            super::dispatch_now(data);
            return;
        };

        if nested {
            let queued =
                PENDING.try_with(|pending| pending.borrow_mut().push_back(core::mem::take(data)));
            if queued.is_err() {
                super::dispatch_now(data);
            }
            return;
        }

        let _guard = DispatchGuard;
        super::dispatch_now(data);
    }

    fn pop_pending() -> Option<ErrataData> {
        PENDING
            .try_with(|pending| pending.borrow_mut().pop_front())
            .ok()
            .flatten()
    }
}
