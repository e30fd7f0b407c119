//! Layout model, validation and interactive view for multi-level autoclave nesting batches.
//!
//! A [`NestingBatch`](entities::NestingBatch) places tools on the base plane of an autoclave
//! and, optionally, on an elevated plane resting on support fixtures ("cavalletti").
//! [`validate`](validation::validate) checks every geometric and bookkeeping invariant of such a batch,
//! [`io`] converts it from and to its wire representation, and [`view::LayoutView`]
//! derives the interactive state a consumer needs to render it.

/// Value types describing a nesting result
pub mod entities;

/// Axis-aligned geometric primitives
pub mod geometry;

/// External representations and the conversion logic between them and [`entities`]
pub mod io;

/// Helper functionality
pub mod util;

/// Invariant checks for [`NestingBatch`](entities::NestingBatch)es
pub mod validation;

/// Interactive state derived from a delivered batch
pub mod view;
