//! Field descriptors: the per-field metadata that drives hydration.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::dto::{Dto, Payload};
use crate::error::HydrateError;
use crate::factory::DtoFactory;

bitflags::bitflags! {
    /// Hydration-relevant traits of a declared field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldFlags: u8 {
        /// Never assigned from payload data (`#[dto(skip)]`).
        const EXCLUDED = 1;
        /// `Option` field; absence hydrates to `None`.
        const NULLABLE = 1 << 1;
        /// Has a declared default applied when the key is absent.
        const HAS_DEFAULT = 1 << 2;
        /// The field's type is itself a DTO and is hydrated recursively.
        const NESTED = 1 << 3;
    }
}

/// What the payload offers for a single field.
pub enum FieldSource<'a> {
    /// The payload contains a value under the field's key.
    Present(&'a Value),
    /// The key is absent (or the field is excluded from hydration).
    Absent,
}

/// Descriptor for one declared field of `T`.
///
/// The `fill` function is generated by `#[derive(Dto)]` and encodes the
/// per-field policy: deserialize or recurse on a present value, apply the
/// default or `None` fallback on an absent one.
pub struct Field<T: Dto> {
    /// Payload key the field is read from.
    pub name: &'static str,
    /// Exclusion, nullability, default and nesting markers.
    pub flags: FieldFlags,
    /// Write this field's slot of the partial accumulator.
    pub fill: fn(&mut T::Partial, FieldSource<'_>, &DtoFactory) -> Result<(), HydrateError>,
}

/// Deserialize a payload value into a field's declared type.
pub fn from_value<F: DeserializeOwned>(
    dto: &'static str,
    field: &'static str,
    value: &Value,
) -> Result<F, HydrateError> {
    serde_json::from_value(value.clone())
        .map_err(|err| HydrateError::field(dto, field, err))
}

/// Interpret a payload value as the payload of a nested DTO field.
pub fn as_nested<'a>(
    dto: &'static str,
    field: &'static str,
    value: &'a Value,
) -> Result<&'a Payload, HydrateError> {
    value
        .as_object()
        .ok_or_else(|| HydrateError::field(dto, field, "nested DTO fields expect an object value"))
}
