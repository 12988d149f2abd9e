//! Implementation of `#[derive(Dto)]`.
//!
//! For a struct with named fields the expansion produces:
//!
//! - a partial accumulator struct with one `Option` slot per field
//! - one fill function per field, encoding its present/absent policy
//! - the `Dto` impl (name, descriptor table, assembly)
//! - an `inventory` submission making the type reachable by name

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Field, Fields, LitStr, Token, Type, parse_macro_input};

pub fn expand(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_input(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// How an absent field obtains its default value.
enum DefaultKind {
    /// `#[dto(default)]` - `Default::default()`.
    Trait,
    /// `#[dto(default = "path::to::fn")]` - call the named function.
    Path(syn::Path),
}

#[derive(Default)]
struct FieldOpts {
    skip: bool,
    nested: bool,
    default: Option<DefaultKind>,
    rename: Option<String>,
}

fn field_opts(field: &Field) -> syn::Result<FieldOpts> {
    let mut opts = FieldOpts::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("dto") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                opts.skip = true;
                Ok(())
            } else if meta.path.is_ident("nested") {
                opts.nested = true;
                Ok(())
            } else if meta.path.is_ident("default") {
                if meta.input.peek(Token![=]) {
                    let lit: LitStr = meta.value()?.parse()?;
                    opts.default = Some(DefaultKind::Path(lit.parse()?));
                } else {
                    opts.default = Some(DefaultKind::Trait);
                }
                Ok(())
            } else if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                opts.rename = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unknown `dto` field attribute"))
            }
        })?;
    }
    Ok(opts)
}

/// Parse the container-level `#[dto(name = "...")]` attribute, if any.
fn container_name(input: &DeriveInput) -> syn::Result<Option<String>> {
    let mut name = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("dto") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                name = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unknown `dto` container attribute"))
            }
        })?;
    }
    Ok(name)
}

/// `Option<T>` detection: the inner type if the field is nullable.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn expand_input(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let vis = &input.vis;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "generic DTO types are not supported",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "#[derive(Dto)] requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "#[derive(Dto)] can only be used on structs",
            ));
        }
    };

    let dto_name = container_name(input)?.unwrap_or_else(|| name.to_string());
    let partial_ident = format_ident!("__{}Partial", name);

    let mut partial_fields = Vec::new();
    let mut fill_fns = Vec::new();
    let mut descriptors = Vec::new();
    let mut assembly = Vec::new();

    for field in fields {
        let opts = field_opts(field)?;
        let ident = field.ident.as_ref().expect("named field");
        let ty = &field.ty;
        let key = opts.rename.clone().unwrap_or_else(|| ident.to_string());
        let inner = option_inner(ty);
        let nullable = inner.is_some();
        let fill_ident = format_ident!("__fill_{}", ident);

        partial_fields.push(quote! {
            #ident: ::core::option::Option<#ty>
        });

        let mut flags = quote! { ::hydrator::FieldFlags::empty() };
        if opts.skip {
            flags = quote! { #flags.union(::hydrator::FieldFlags::EXCLUDED) };
        }
        if nullable {
            flags = quote! { #flags.union(::hydrator::FieldFlags::NULLABLE) };
        }
        if opts.default.is_some() {
            flags = quote! { #flags.union(::hydrator::FieldFlags::HAS_DEFAULT) };
        }
        if opts.nested {
            flags = quote! { #flags.union(::hydrator::FieldFlags::NESTED) };
        }

        let absent = match (&opts.default, nullable) {
            (Some(DefaultKind::Trait), _) => quote! {
                partial.#ident =
                    ::core::option::Option::Some(::core::default::Default::default());
            },
            (Some(DefaultKind::Path(path)), _) => quote! {
                partial.#ident = ::core::option::Option::Some(#path());
            },
            (None, true) => quote! {
                partial.#ident = ::core::option::Option::Some(::core::option::Option::None);
            },
            (None, false) => quote! {},
        };

        if opts.skip {
            // Excluded fields never take a payload value; the fallback
            // applies whether or not the key is present.
            fill_fns.push(quote! {
                #[allow(unused_variables)]
                fn #fill_ident(
                    partial: &mut #partial_ident,
                    _source: ::hydrator::FieldSource<'_>,
                    _factory: &::hydrator::DtoFactory,
                ) -> ::core::result::Result<(), ::hydrator::HydrateError> {
                    #absent
                    ::core::result::Result::Ok(())
                }
            });
        } else {
            let present = if opts.nested {
                match inner {
                    Some(inner_ty) => quote! {
                        if value.is_null() {
                            partial.#ident = ::core::option::Option::Some(
                                ::core::option::Option::None,
                            );
                        } else {
                            let nested = ::hydrator::as_nested(#dto_name, #key, value)?;
                            partial.#ident = ::core::option::Option::Some(
                                ::core::option::Option::Some(
                                    factory.make::<#inner_ty>(nested)?,
                                ),
                            );
                        }
                    },
                    None => quote! {
                        let nested = ::hydrator::as_nested(#dto_name, #key, value)?;
                        partial.#ident =
                            ::core::option::Option::Some(factory.make::<#ty>(nested)?);
                    },
                }
            } else {
                quote! {
                    partial.#ident = ::core::option::Option::Some(
                        ::hydrator::from_value::<#ty>(#dto_name, #key, value)?,
                    );
                }
            };

            let factory_pat = if opts.nested {
                quote! { factory }
            } else {
                quote! { _factory }
            };

            fill_fns.push(quote! {
                fn #fill_ident(
                    partial: &mut #partial_ident,
                    source: ::hydrator::FieldSource<'_>,
                    #factory_pat: &::hydrator::DtoFactory,
                ) -> ::core::result::Result<(), ::hydrator::HydrateError> {
                    match source {
                        ::hydrator::FieldSource::Present(value) => { #present }
                        ::hydrator::FieldSource::Absent => { #absent }
                    }
                    ::core::result::Result::Ok(())
                }
            });
        }

        descriptors.push(quote! {
            ::hydrator::Field {
                name: #key,
                flags: #flags,
                fill: #fill_ident,
            }
        });

        assembly.push(quote! {
            #ident: partial.#ident.ok_or(::hydrator::HydrateError::MissingField {
                dto: #dto_name,
                field: #key,
            })?
        });
    }

    let expanded = quote! {
        #[doc(hidden)]
        #[derive(Default)]
        #[allow(non_camel_case_types, missing_docs)]
        #vis struct #partial_ident {
            #(#partial_fields,)*
        }

        const _: () = {
            #(#fill_fns)*

            impl ::hydrator::Dto for #name {
                const NAME: &'static str = #dto_name;
                type Partial = #partial_ident;
                const FIELDS: &'static [::hydrator::Field<Self>] = &[
                    #(#descriptors),*
                ];

                fn assemble(
                    partial: Self::Partial,
                ) -> ::core::result::Result<Self, ::hydrator::HydrateError> {
                    ::core::result::Result::Ok(Self {
                        #(#assembly),*
                    })
                }
            }

            fn __hydrate(
                factory: &::hydrator::DtoFactory,
                payload: &::hydrator::Payload,
            ) -> ::core::result::Result<
                ::std::boxed::Box<dyn ::core::any::Any + ::core::marker::Send + ::core::marker::Sync>,
                ::hydrator::HydrateError,
            > {
                ::hydrator::hydrate::<#name>(factory, payload).map(|dto| {
                    ::std::boxed::Box::new(dto)
                        as ::std::boxed::Box<
                            dyn ::core::any::Any + ::core::marker::Send + ::core::marker::Sync,
                        >
                })
            }

            ::hydrator::inventory::submit! {
                ::hydrator::DtoRegistration {
                    name: #dto_name,
                    type_id: ::core::any::TypeId::of::<#name>(),
                    hydrate: __hydrate,
                }
            }
        };
    };

    Ok(expanded)
}
