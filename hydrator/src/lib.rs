//! # hydrator - payload-to-DTO hydration
//!
//! `hydrator` constructs data-transfer objects from associative payloads.
//! A [`DtoFactory`] dispatches each request either to a registered custom
//! factory callback or to descriptor-driven hydration: walking the type's
//! declared fields, assigning present payload values (recursing into nested
//! DTO fields), and applying default or nullable fallbacks for absent ones.
//!
//! Field descriptors are generated at build time by `#[derive(Dto)]` - there
//! is no runtime reflection. Descriptor tables are `'static`, and the
//! factory's by-name variant table is built lazily on first use and kept for
//! the factory's lifetime.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use hydrator::{Dto, DtoFactory};
//!
//! #[derive(Dto)]
//! struct Address {
//!     street: String,
//!     #[dto(default = "default_zip")]
//!     zip: String,
//! }
//!
//! #[derive(Dto)]
//! struct User {
//!     name: String,
//!     #[dto(nested)]
//!     address: Address,
//! }
//!
//! let factory = DtoFactory::new();
//! let user: User = factory.make(&payload)?;
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod dto;
mod error;
mod factory;
mod field;
mod hydrate;

pub use dto::{Dto, DtoRegistration, Payload};
pub use error::{BoxError, HydrateError};
pub use factory::DtoFactory;
pub use field::{Field, FieldFlags, FieldSource, as_nested, from_value};
pub use hydrate::hydrate;

/// Derive macro generating the [`Dto`] implementation for a struct.
pub use hydrator_macros::Dto;

// Re-exported for the output of `#[derive(Dto)]`.
#[doc(hidden)]
pub use inventory;

/// An arbitrary payload value (re-exported from `serde_json`).
pub use serde_json::Value;
