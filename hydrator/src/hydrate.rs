//! Descriptor-driven hydration.

use crate::dto::{Dto, Payload};
use crate::error::HydrateError;
use crate::factory::DtoFactory;
use crate::field::{FieldFlags, FieldSource};

/// Hydrate a `T` from the payload by walking its field descriptor table.
///
/// For each declared field, in declaration order:
///
/// - if the payload has a value under the field's key and the field is not
///   excluded, the value is assigned (recursing through
///   [`DtoFactory::make`] for nested DTO fields);
/// - otherwise the field's default is applied if it has one, `None` is
///   assigned if the field is nullable, and the slot is left empty
///   otherwise.
///
/// An empty required slot surfaces as [`HydrateError::MissingField`] when
/// the final value is assembled.
///
/// Excluded fields always take the absent path: a payload value under their
/// key is ignored, but the default/`None` fallback still applies.
pub fn hydrate<T: Dto>(factory: &DtoFactory, payload: &Payload) -> Result<T, HydrateError> {
    #[cfg(feature = "tracing")]
    tracing::trace!(dto = T::NAME, fields = T::FIELDS.len(), "hydrating from descriptors");

    let mut partial = T::Partial::default();
    for field in T::FIELDS {
        let source = match payload.get(field.name) {
            Some(value) if !field.flags.contains(FieldFlags::EXCLUDED) => {
                FieldSource::Present(value)
            }
            _ => FieldSource::Absent,
        };
        (field.fill)(&mut partial, source, factory)?;
    }
    T::assemble(partial)
}
