#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Extra checks on nightly
#![cfg_attr(nightly_extra_checks, feature(rustdoc_missing_doc_code_examples))]
#![cfg_attr(nightly_extra_checks, forbid(rustdoc::missing_doc_code_examples))]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Cheap, stackable, severity-tagged diagnostics for latency-sensitive code.
//!
//! ## Overview
//!
//! An [`Errata`] is a stack of human-readable messages, each tagged with a
//! [`Severity`]. Deeply nested calls add notes to it and hand it back up the
//! call chain, where callers add their own context on top. Nothing is thrown
//! and nothing is formatted twice: the messages live in a small bump
//! allocator owned by the errata, and handing an errata around is a pointer
//! move.
//!
//! An empty errata is a null handle and allocates nothing, so the success path
//! costs the same as returning `()`.
//!
//! ## Quick Example
//!
//! ```
//! use errata::prelude::*;
//!
//! fn parse_port(text: &str) -> Rv<u16> {
//!     match text.parse() {
//!         Ok(port) => Rv::new(port),
//!         Err(e) => errata!(Severity::Error, "invalid port {text:?}: {e}").into(),
//!     }
//! }
//!
//! fn load() -> Rv<u16> {
//!     let mut rv = parse_port("80x");
//!     if !rv.is_ok() {
//!         rv.note(Severity::Info, "while loading the listener configuration");
//!     }
//!     rv
//! }
//!
//! let (port, errata) = load().into_parts();
//! assert_eq!(port, 0);
//! assert!(errata.is_err());
//! assert_eq!(errata.count(), 2);
//! # errata.dismiss();
//! ```
//!
//! ## Core Concepts
//!
//! - **Severity**: [`Diag`](Severity::Diag) < [`Info`](Severity::Info) <
//!   [`Warn`](Severity::Warn) < [`Error`](Severity::Error). The severity of an
//!   errata is the highest severity of its notes. An errata is *ok* while its
//!   severity is below [`Severity::FAILURE`], so informational notes can ride
//!   along on a successful result.
//! - **Sharing**: cloning an errata is a reference count increment. All clones
//!   see the same notes. Adding a note requires the handle to be the only one;
//!   mutating a shared errata is a programming error and panics.
//! - **Abandonment**: when the last handle to a non-empty errata is dropped
//!   without being [dismissed](Errata::dismiss) or [cleared](Errata::clear),
//!   the errata is handed to the registered [sinks], exactly once. This is how
//!   diagnostics nobody looked at still end up somewhere.
//! - **Result pairs**: [`Rv<T>`] bundles a value with an errata for functions
//!   that return something useful even when they have something to say.
//!
//! For the storage layer, see the [`errata-internals`] crate.
//!
//! [`errata-internals`]: errata_internals
//!
//! ## Ecosystem
//!
//! - **[`errata-tracing`]** - A sink that forwards abandoned errata to
//!   `tracing` events.
//!
//! [`errata-tracing`]: https://docs.rs/errata-tracing
//!
//! ## Feature Flags
//!
//! - `std`: uses `std::sync::RwLock` for the sink registry, defers nested
//!   abandonment inside sinks and adds [`Errata::write_to`].
//! - `compat-anyhow1`: conversions to and from `anyhow` (see [`compat`]).

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod macros;

pub mod compat;
pub mod formatting;
pub mod prelude;
pub mod sinks;

mod annotation;
mod errata;
mod result_ext;
mod rv;

pub use errata_internals::{ParseSeverityError, Severity};

pub use self::{
    annotation::AnnotationRef,
    errata::{iter::ErrataIter, owned::Errata, ref_::ErrataRef},
    result_ext::ResultExt,
    rv::{Rv, make_rv},
};

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    pub use core::format_args;

    use core::fmt;

    use crate::{Errata, Severity};

    #[doc(hidden)]
    #[inline]
    #[cold]
    #[must_use]
    pub fn format_errata(severity: Severity, args: fmt::Arguments<'_>) -> Errata {
        let mut errata = Errata::new();
        errata.note_fmt(severity, args);
        errata
    }
}
