//! The DTO contract: the marker trait and the by-name registration record.

use std::any::{Any, TypeId};

use crate::error::HydrateError;
use crate::factory::DtoFactory;
use crate::field::Field;

/// The payload a DTO is hydrated from: a map of field name to arbitrary value.
///
/// Payloads are borrowed for the duration of a `make` call and never retained.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// A type that can be hydrated from a [`Payload`].
///
/// Implemented via `#[derive(Dto)]`, which generates the field descriptor
/// table and the partial accumulator. Hand-written implementations are
/// possible but rarely worth it.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Dto)]
/// struct Address {
///     street: String,
///     #[dto(default = "default_zip")]
///     zip: String,
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a DTO type",
    label = "must implement `Dto`",
    note = "Annotate the struct with `#[derive(Dto)]` to generate its field descriptors."
)]
pub trait Dto: Any + Send + Sync + Sized + 'static {
    /// The name this type is known by to the by-name API
    /// ([`DtoFactory::make_dyn`], [`DtoFactory::can_make`]).
    const NAME: &'static str;

    /// Accumulator holding one optional slot per declared field.
    ///
    /// Plays the role of a bare, not-yet-constructed instance: fields are
    /// assigned into it one by one, and [`Dto::assemble`] produces the final
    /// value.
    type Partial: Default;

    /// Field descriptors, in declaration order.
    const FIELDS: &'static [Field<Self>];

    /// Produce the final value from the accumulated fields.
    ///
    /// Fails with [`HydrateError::MissingField`] for any slot that is still
    /// empty and has neither a default nor a nullable type.
    fn assemble(partial: Self::Partial) -> Result<Self, HydrateError>;
}

/// Registration record making a DTO type reachable by name.
///
/// One of these is submitted to the `inventory` registry by every
/// `#[derive(Dto)]` expansion; [`DtoFactory`] collects them lazily into its
/// variant table on first by-name lookup.
pub struct DtoRegistration {
    /// The type's [`Dto::NAME`].
    pub name: &'static str,
    /// `TypeId` of the concrete type, used to verify custom factory output.
    pub type_id: TypeId,
    /// Descriptor-driven hydration entry point, type-erased.
    pub hydrate: fn(&DtoFactory, &Payload) -> Result<Box<dyn Any + Send + Sync>, HydrateError>,
}

inventory::collect!(DtoRegistration);
