//! `#[derive(SqlEnum)]`: map a unit-only Rust enum to a stored name or ordinal.

use crate::attrs::{OrmArg, orm_args, unknown};
use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Expr, ExprLit, ExprUnary, Fields, Lit, Result, UnOp};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    let variants = match &input.data {
        Data::Enum(e) => &e.variants,
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "SqlEnum can only be derived for enums",
            ));
        }
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "SqlEnum cannot be derived for generic types",
        ));
    }

    let repr = parse_repr(&input)?;
    let type_name = name.to_string();

    let mut arms = Vec::with_capacity(variants.len());
    let mut next_ordinal: i64 = 0;
    for variant in variants {
        if !matches!(&variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "SqlEnum variants must be unit variants (no fields)",
            ));
        }

        let ordinal = match &variant.discriminant {
            Some((_, expr)) => discriminant(expr)?,
            None => next_ordinal,
        };
        next_ordinal = ordinal.checked_add(1).ok_or_else(|| {
            syn::Error::new_spanned(variant, "enum discriminant overflows i64")
        })?;

        let variant_ident = &variant.ident;
        let stored =
            parse_rename(variant)?.unwrap_or_else(|| variant_ident.to_string().to_snake_case());

        arms.push(quote! {
            #name::#variant_ident => (#stored, #ordinal),
        });
    }

    Ok(quote! {
        impl ::core::convert::From<&#name> for ::exprorm::Value {
            fn from(value: &#name) -> Self {
                let (name, ordinal): (&'static str, i64) = match value {
                    #(#arms)*
                };
                ::exprorm::Value::Enum(::exprorm::EnumValue {
                    type_name: #type_name,
                    name,
                    ordinal,
                    repr: #repr,
                })
            }
        }

        impl ::core::convert::From<#name> for ::exprorm::Value {
            fn from(value: #name) -> Self {
                ::exprorm::Value::from(&value)
            }
        }

        impl ::exprorm::SqlType for #name {
            const KIND: ::exprorm::ValueKind = ::exprorm::ValueKind::Enum(#repr);

            fn to_value(&self) -> ::exprorm::Value {
                ::exprorm::Value::from(self)
            }
        }
    })
}

/// `#[orm(repr = "text" | "int")]`, defaulting to text.
fn parse_repr(input: &DeriveInput) -> Result<TokenStream> {
    let mut repr = quote! { ::exprorm::EnumRepr::Text };
    for arg in orm_args(&input.attrs)? {
        match &arg {
            OrmArg::Str(path, lit) if path.is_ident("repr") => {
                repr = match lit.value().as_str() {
                    "text" => quote! { ::exprorm::EnumRepr::Text },
                    "int" => quote! { ::exprorm::EnumRepr::Int },
                    other => {
                        return Err(syn::Error::new_spanned(
                            lit,
                            format!("unknown repr '{other}'; expected \"text\" or \"int\""),
                        ));
                    }
                };
            }
            _ => return Err(unknown(&arg, "repr = \"text\" | \"int\"")),
        }
    }
    Ok(repr)
}

fn parse_rename(variant: &syn::Variant) -> Result<Option<String>> {
    let mut rename = None;
    for arg in orm_args(&variant.attrs)? {
        match &arg {
            OrmArg::Str(path, lit) if path.is_ident("rename") => rename = Some(lit.value()),
            _ => return Err(unknown(&arg, "rename = \"...\"")),
        }
    }
    Ok(rename)
}

/// Integer literal discriminants, optionally negated.
fn discriminant(expr: &Expr) -> Result<i64> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(int), ..
        }) => int.base10_parse::<i64>(),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => discriminant(expr).map(|n| -n),
        other => Err(syn::Error::new_spanned(
            other,
            "SqlEnum discriminants must be integer literals",
        )),
    }
}
