#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`errata`].
//!
//! # Overview
//!
//! This crate contains the low-level storage that powers the [`errata`]
//! diagnostics library: the bump allocator that holds message text, the
//! bounded writer used to render formatted messages into it, and the
//! annotation chain that records the messages themselves.
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`errata`] crate, not this one.
//!
//! # Architecture
//!
//! - **[`arena`]**: [`MessageArena`], a chunked bump allocator. Allocations are
//!   identified by [`ArenaSpan`] handles and are never relocated.
//! - **[`render`]**: [`FixedBufferWriter`], a [`core::fmt::Write`] into a
//!   bounded byte span that keeps measuring after it runs out of room.
//! - **[`annotation`]**: [`Annotation`] records and the newest-first
//!   [`AnnotationChain`].
//! - **[`data`]**: [`ErrataData`], the payload shared between all handles of
//!   one errata. It ties the arena, the chain and the aggregate severity
//!   together and implements the two-phase text commit.
//!
//! Reference counting, the exclusivity rule and sink dispatch live in the
//! [`errata`] crate; everything here assumes it has exclusive access whenever
//! it is handed a `&mut`.
//!
//! [`errata`]: https://docs.rs/errata/latest/errata/
//! [`MessageArena`]: arena::MessageArena
//! [`ArenaSpan`]: arena::ArenaSpan
//! [`FixedBufferWriter`]: render::FixedBufferWriter
//! [`Annotation`]: annotation::Annotation
//! [`AnnotationChain`]: annotation::AnnotationChain
//! [`ErrataData`]: data::ErrataData

extern crate alloc;

pub mod annotation;
pub mod arena;
pub mod data;
pub mod render;
mod severity;

pub use annotation::{Annotation, AnnotationChain};
pub use arena::{ArenaSpan, MessageArena};
pub use data::{ErrataData, RawAnnotation};
pub use render::FixedBufferWriter;
pub use severity::{ParseSeverityError, Severity};
