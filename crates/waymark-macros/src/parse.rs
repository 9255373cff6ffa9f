//! Parsing utilities for the record derive.
//!
//! Turns a `DeriveInput` into a [`RecordDef`]: the struct name, the path of
//! the core crate, and one [`FieldDef`] per named field.

use std::collections::HashSet;

use syn::{
    parse::ParseStream, spanned::Spanned, Attribute, Data, DeriveInput, Fields, GenericArgument,
    Ident, LitStr, Path, PathArguments, Token, Type,
};

/// Integer types the binder parses.
const INTEGER_TYPES: &[&str] = &[
    "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize",
];

/// A parsed record struct.
#[derive(Debug)]
pub struct RecordDef {
    /// The struct name.
    pub name: Ident,
    /// Path used to reach the core crate in generated code.
    pub core: Path,
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
}

/// A parsed record field.
#[derive(Debug)]
pub struct FieldDef {
    /// The field identifier.
    pub ident: Ident,
    /// The field type.
    pub ty: Type,
    /// Wire annotation as written, modifiers included.
    pub wire: Option<LitStr>,
    /// Whether the generated accessors expose the field.
    pub bindable: bool,
}

/// Contents of a `#[wire(..)]` attribute.
#[derive(Debug)]
struct WireAttr {
    wire: LitStr,
    scalar: bool,
}

impl RecordDef {
    /// Parses a derive input.
    pub fn parse(input: DeriveInput) -> syn::Result<Self> {
        if !input.generics.params.is_empty() {
            return Err(syn::Error::new(
                input.generics.span(),
                "Record cannot be derived for generic structs",
            ));
        }

        let core = parse_crate_path(&input.attrs)?;

        let fields = match input.data {
            Data::Struct(data) => match data.fields {
                Fields::Named(named) => named.named.into_iter().collect::<Vec<_>>(),
                Fields::Unit => Vec::new(),
                Fields::Unnamed(unnamed) => {
                    return Err(syn::Error::new(
                        unnamed.span(),
                        "Record requires named fields",
                    ))
                }
            },
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span,
                    "Record can only be derived for structs",
                ))
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span,
                    "Record can only be derived for structs",
                ))
            }
        };

        let mut seen = HashSet::new();
        let mut defs = Vec::with_capacity(fields.len());
        for field in fields {
            let ident = field
                .ident
                .clone()
                .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;
            let wire_attr = parse_wire_attr(&field.attrs)?;

            if let Some(attr) = &wire_attr {
                let value = attr.wire.value();
                let name = value.split(',').next().unwrap_or_default().to_string();
                if name.is_empty() {
                    return Err(syn::Error::new(attr.wire.span(), "wire name cannot be empty"));
                }
                if !seen.insert(name.clone()) {
                    return Err(syn::Error::new(
                        attr.wire.span(),
                        format!("duplicate wire name '{name}'"),
                    ));
                }
            }

            let bindable = wire_attr.as_ref().is_some_and(|a| a.scalar) || is_bindable(&field.ty);
            defs.push(FieldDef {
                ident,
                ty: field.ty,
                wire: wire_attr.map(|a| a.wire),
                bindable,
            });
        }

        Ok(Self {
            name: input.ident,
            core,
            fields: defs,
        })
    }
}

/// Reads `#[record(crate = "...")]`, defaulting to `::waymark_core`.
fn parse_crate_path(attrs: &[Attribute]) -> syn::Result<Path> {
    let mut core: Path = syn::parse_quote!(::waymark_core);
    for attr in attrs.iter().filter(|a| a.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let lit: LitStr = meta.value()?.parse()?;
                core = lit.parse()?;
                Ok(())
            } else {
                Err(meta.error("unsupported record attribute"))
            }
        })?;
    }
    Ok(core)
}

fn parse_wire_attr(attrs: &[Attribute]) -> syn::Result<Option<WireAttr>> {
    let mut found = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("wire")) {
        if found.is_some() {
            return Err(syn::Error::new(attr.span(), "duplicate wire attribute"));
        }
        found = Some(attr.parse_args_with(|input: ParseStream| {
            let wire: LitStr = input.parse()?;
            let mut scalar = false;
            if input.parse::<Option<Token![,]>>()?.is_some() {
                let flag: Ident = input.parse()?;
                if flag != "scalar" {
                    return Err(syn::Error::new(flag.span(), "expected `scalar`"));
                }
                scalar = true;
            }
            Ok(WireAttr { wire, scalar })
        })?);
    }
    Ok(found)
}

/// Decides from the written type whether the field implements `FieldValue`.
///
/// `String`, the primitive integers and `Nullable<X>` of those are
/// bindable; anything else is opaque unless marked `scalar`.
fn is_bindable(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    if type_path.qself.is_some() {
        return false;
    }
    let Some(segment) = type_path.path.segments.last() else {
        return false;
    };

    let name = segment.ident.to_string();
    match (&segment.arguments, name.as_str()) {
        (PathArguments::None, "String") => true,
        (PathArguments::None, n) => INTEGER_TYPES.contains(&n),
        (PathArguments::AngleBracketed(args), "Nullable") => {
            let mut iter = args.args.iter();
            match (iter.next(), iter.next()) {
                (Some(GenericArgument::Type(inner)), None) => is_bindable(inner),
                _ => false,
            }
        }
        _ => false,
    }
}
