//! The factory registry and dispatcher.

use std::any::Any;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::dto::{Dto, DtoRegistration, Payload};
use crate::error::HydrateError;
use crate::hydrate::hydrate;

type ErasedFactory =
    Box<dyn Fn(&Payload) -> Result<Box<dyn Any + Send + Sync>, HydrateError> + Send + Sync>;

/// Constructs DTO instances, dispatching to custom factories or
/// descriptor-driven hydration.
///
/// Custom factories are registered per type name and take precedence over
/// hydration. Registration takes `&mut self`; construction and queries take
/// `&self`, so a populated factory can be shared behind an `Arc`.
///
/// # Example
///
/// ```rust,ignore
/// let mut factory = DtoFactory::new();
/// factory
///     .add_factory::<Session, _>(|payload| Session::open(payload))
///     .add_factory::<Token, _>(|payload| Token::parse(payload));
///
/// let user: User = factory.make(&payload)?;
/// ```
#[derive(Default)]
pub struct DtoFactory {
    factories: HashMap<String, ErasedFactory>,
    variants: OnceLock<HashMap<&'static str, &'static DtoRegistration>>,
}

impl DtoFactory {
    /// Create a factory with no custom registrations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a `T` from the payload.
    ///
    /// Dispatches to the custom factory registered under [`Dto::NAME`] if
    /// one exists, verifying that its output actually is a `T`
    /// ([`HydrateError::FactoryMismatch`] otherwise). Without a custom
    /// factory, the descriptor-driven [`hydrate`] path is used.
    pub fn make<T: Dto>(&self, payload: &Payload) -> Result<T, HydrateError> {
        match self.factories.get(T::NAME) {
            Some(factory) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(dto = T::NAME, "dispatching to custom factory");

                let made = factory(payload)?;
                match made.downcast::<T>() {
                    Ok(dto) => Ok(*dto),
                    Err(_) => Err(HydrateError::FactoryMismatch { dto: T::NAME }),
                }
            }
            None => hydrate(self, payload),
        }
    }

    /// Construct a DTO by its registered name, type-erased.
    ///
    /// Fails with [`HydrateError::UnknownDto`] if `name` does not identify a
    /// registered DTO type. Custom factory output is checked against the
    /// registered type's `TypeId`; a mismatch is
    /// [`HydrateError::FactoryMismatch`].
    pub fn make_dyn(
        &self,
        name: &str,
        payload: &Payload,
    ) -> Result<Box<dyn Any + Send + Sync>, HydrateError> {
        let registration = self
            .variant(name)
            .ok_or_else(|| HydrateError::UnknownDto(name.to_string()))?;

        match self.factories.get(name) {
            Some(factory) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(dto = registration.name, "dispatching to custom factory");

                let made = factory(payload)?;
                if made.as_ref().type_id() != registration.type_id {
                    return Err(HydrateError::FactoryMismatch {
                        dto: registration.name,
                    });
                }
                Ok(made)
            }
            None => (registration.hydrate)(self, payload),
        }
    }

    /// Whether `name` identifies a registered DTO type, regardless of
    /// whether a custom factory exists for it.
    pub fn can_make(&self, name: &str) -> bool {
        self.variant(name).is_some()
    }

    /// Whether a custom factory is registered under `name`.
    pub fn has_factory(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Whether a custom factory is registered for `T`.
    pub fn has_factory_for<T: Dto>(&self) -> bool {
        self.has_factory(T::NAME)
    }

    /// Register a custom factory for `T`, replacing any previous one.
    ///
    /// Returns `&mut Self` so registrations can be chained.
    pub fn add_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Dto,
        F: Fn(&Payload) -> Result<T, HydrateError> + Send + Sync + 'static,
    {
        self.factories.insert(
            T::NAME.to_string(),
            Box::new(move |payload| {
                factory(payload).map(|dto| Box::new(dto) as Box<dyn Any + Send + Sync>)
            }),
        );
        self
    }

    /// Register a type-erased custom factory under an arbitrary name.
    ///
    /// The name is not validated against the DTO registry here; `make_dyn`
    /// performs that check on use. Output of the callback is type-checked at
    /// `make` time.
    pub fn add_factory_raw<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Payload) -> Result<Box<dyn Any + Send + Sync>, HydrateError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
        self
    }

    // The variant table is built once, on first by-name lookup, and kept for
    // the factory's lifetime.
    fn variant(&self, name: &str) -> Option<&'static DtoRegistration> {
        let variants = self.variants.get_or_init(|| {
            inventory::iter::<DtoRegistration>
                .into_iter()
                .map(|registration| (registration.name, registration))
                .collect()
        });
        variants.get(name).copied()
    }
}
