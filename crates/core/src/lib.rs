//! cuppa-core: coffee order parsing core.
//!
//! Turns free-form order text ("Large Cap 2 Sugars", "yfw") into a
//! normalized [`Order`] over a closed set of attributes, and derives the
//! canonical stored form, the display string and the price lookup keys.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`build_registry()`] -- construct the attribute [`Registry`]
//! - [`Vocabulary`] -- longest-match-first tokenizer over the registry
//! - [`OrderParser`] -- registry + vocabulary, the entry point for parsing,
//!   assignment, validation and decoding
//! - [`Order`] -- the resolved order (encode, display, price keys)
//! - [`SpecError`] -- error type
//!
//! The registry is immutable once built; everything else is owned by the
//! call that created it, so orders can be parsed from many threads at once.

pub mod attribute;
pub mod error;
pub mod group;
pub mod lexer;
pub mod order;
pub mod price;
pub mod registry;

// ── Convenience re-exports: key types ────────────────────────────────

pub use attribute::Attribute;
pub use error::SpecError;
pub use group::{group_orders, OrderGroup};
pub use lexer::{Vocabulary, FILLER_WORDS};
pub use order::{Order, OrderParser};
pub use price::{FuzzLevel, CAPPUCCINO_EQUIVALENTS};
pub use registry::{build_registry, AttributeSpec, Registry};
