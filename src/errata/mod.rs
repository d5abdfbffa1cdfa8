//! The diagnostic stack and its views.
//!
//! - [`owned`]: [`Errata`](owned::Errata), the owning, reference-counted
//!   handle.
//! - [`ref_`]: [`ErrataRef`](ref_::ErrataRef), a copyable read-only view, as
//!   handed to sinks.
//! - [`iter`]: newest-first iteration over the notes.

pub(crate) mod iter;
pub(crate) mod owned;
pub(crate) mod ref_;
