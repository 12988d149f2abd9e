//! Procedural macros for the `hydrator` crate.

use proc_macro::TokenStream;

mod dto;

/// Derive macro generating a `Dto` implementation for a struct with named
/// fields.
///
/// Field attributes:
///
/// - `#[dto(skip)]` - never assign the field from payload data
/// - `#[dto(nested)]` - the field's type is itself a DTO; hydrate it
///   recursively through the factory
/// - `#[dto(default)]` / `#[dto(default = "path::to::fn")]` - value applied
///   when the payload key is absent
/// - `#[dto(rename = "key")]` - read the field from a different payload key
///
/// Container attribute:
///
/// - `#[dto(name = "...")]` - register the type under a custom name
///
/// Fields of type `Option<T>` are nullable: absence (or JSON `null`)
/// hydrates them to `None`.
#[proc_macro_derive(Dto, attributes(dto))]
pub fn derive_dto(input: TokenStream) -> TokenStream {
    dto::expand(input)
}
