//! Record derive expansion.

use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::DeriveInput;

use crate::parse::RecordDef;

/// Expands `#[derive(Record)]`.
pub fn expand_record(input: DeriveInput) -> syn::Result<TokenStream> {
    let record = RecordDef::parse(input)?;
    Ok(generate_record_impl(&record))
}

fn generate_record_impl(record: &RecordDef) -> TokenStream {
    let name = &record.name;
    let core = &record.core;
    let type_name = name.to_string();
    let count = record.fields.len();

    let descriptors = record.fields.iter().map(|field| {
        let ident = field.ident.to_string();
        let ty = &field.ty;
        let ty_name = ty.to_token_stream().to_string().replace(' ', "");
        let bindable = field.bindable;
        let wire = match &field.wire {
            Some(lit) => quote! { ::core::option::Option::Some(#lit) },
            None => quote! { ::core::option::Option::None },
        };
        quote! {
            #core::FieldDescriptor {
                ident: #ident,
                wire: #wire,
                type_name: #ty_name,
                type_id: ::core::any::TypeId::of::<#ty>,
                bindable: #bindable,
            }
        }
    });

    let bindable: Vec<_> = record
        .fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.bindable)
        .map(|(index, f)| (index, &f.ident))
        .collect();
    let ref_arms = bindable.iter().map(|(index, ident)| {
        quote! { #index => ::core::option::Option::Some(&self.#ident as &dyn #core::FieldValue), }
    });
    let mut_arms = bindable.iter().map(|(index, ident)| {
        quote! { #index => ::core::option::Option::Some(&mut self.#ident as &mut dyn #core::FieldValue), }
    });

    quote! {
        impl #core::Record for #name {
            fn type_name() -> &'static str {
                #type_name
            }

            fn fields() -> &'static [#core::FieldDescriptor] {
                static FIELDS: [#core::FieldDescriptor; #count] = [#(#descriptors),*];
                &FIELDS
            }

            #[allow(clippy::match_single_binding)]
            fn field(&self, index: usize) -> ::core::option::Option<&dyn #core::FieldValue> {
                match index {
                    #(#ref_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(clippy::match_single_binding)]
            fn field_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn #core::FieldValue> {
                match index {
                    #(#mut_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    }
}
