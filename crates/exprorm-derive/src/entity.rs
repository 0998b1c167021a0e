//! `#[derive(Entity)]`: table metadata and typed field handles.

use crate::attrs::{OrmArg, orm_args, unknown};
use crate::sql_ident::{parse_sql_ident, parse_sql_ident_with_span};
use heck::{ToShoutySnakeCase, ToSnakeCase};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

struct TableAttrs {
    name: String,
    schema: Option<String>,
}

#[derive(Default)]
struct FieldAttrs {
    column: Option<String>,
    primary_key: bool,
    auto_increment: bool,
    reference: bool,
    skip: bool,
}

enum FieldRole {
    Column {
        column: String,
        primary_key: bool,
        auto_increment: bool,
    },
    Reference,
}

struct EntityField<'a> {
    ident: &'a syn::Ident,
    ty: &'a syn::Type,
    /// Field name without the `r#` prefix.
    name: String,
    role: FieldRole,
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let vis = &input.vis;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Entity cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity can only be derived for structs",
            ));
        }
    };

    let table = parse_table_attrs(&input)?;
    let mut entity_fields = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_field_attrs(field)?;
        if attrs.skip {
            continue;
        }
        let field_name = ident.unraw().to_string();
        let role = if attrs.reference {
            FieldRole::Reference
        } else {
            let column = match attrs.column {
                Some(column) => column,
                None => parse_sql_ident_with_span(&field_name, ident.span(), "column name")?,
            };
            FieldRole::Column {
                column,
                primary_key: attrs.primary_key,
                auto_increment: attrs.auto_increment,
            }
        };
        entity_fields.push(EntityField {
            ident,
            ty: &field.ty,
            name: field_name,
            role,
        });
    }

    let fields_ident = format_ident!("{}Fields", name);
    let table_name = &table.name;
    let schema = match &table.schema {
        Some(s) => quote! { ::core::option::Option::Some(#s) },
        None => quote! { ::core::option::Option::None },
    };

    let handle_decls = entity_fields.iter().map(|f| {
        let ident = f.ident;
        let ty = f.ty;
        quote! { pub #ident: ::exprorm::Field<#name, #ty> }
    });
    let handle_inits = entity_fields.iter().map(|f| {
        let ident = f.ident;
        let field_name = &f.name;
        quote! { #ident: ::exprorm::Field::new(#field_name) }
    });

    let mut column_defs = Vec::new();
    let mut column_consts = Vec::new();
    let mut value_arms = Vec::new();
    let mut references = Vec::new();
    for f in &entity_fields {
        let field_name = &f.name;
        match &f.role {
            FieldRole::Column {
                column,
                primary_key,
                auto_increment,
            } => {
                let ty = f.ty;
                let ident = f.ident;
                column_defs.push(quote! {
                    ::exprorm::ColumnDef {
                        field: #field_name,
                        name: #column,
                        kind: <#ty as ::exprorm::SqlType>::KIND,
                        nullable: <#ty as ::exprorm::SqlType>::NULLABLE,
                        primary_key: #primary_key,
                        auto_increment: #auto_increment,
                    }
                });
                let const_ident = format_ident!("COL_{}", field_name.to_shouty_snake_case());
                column_consts.push(quote! {
                    pub const #const_ident: &'static str = #column;
                });
                value_arms.push(quote! {
                    #field_name => ::core::option::Option::Some(::exprorm::SqlType::to_value(&self.#ident)),
                });
            }
            FieldRole::Reference => references.push(field_name.clone()),
        }
    }

    let fields_doc = format!("Typed field handles of [`{name}`].");

    Ok(quote! {
        #[doc = #fields_doc]
        #[derive(Debug, Clone, Copy)]
        #vis struct #fields_ident {
            #(#handle_decls,)*
        }

        impl #name {
            pub const TABLE: &'static str = #table_name;
            #(#column_consts)*
        }

        impl ::exprorm::Entity for #name {
            type Fields = #fields_ident;

            fn table_def() -> &'static ::exprorm::TableDef {
                static TABLE: ::exprorm::TableDef = ::exprorm::TableDef {
                    name: #table_name,
                    schema: #schema,
                    columns: &[#(#column_defs),*],
                    references: &[#(#references),*],
                };
                &TABLE
            }

            fn fields() -> #fields_ident {
                #fields_ident {
                    #(#handle_inits,)*
                }
            }

            fn value_of(&self, field: &str) -> ::core::option::Option<::exprorm::Value> {
                match field {
                    #(#value_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

fn parse_table_attrs(input: &DeriveInput) -> Result<TableAttrs> {
    let mut name = None;
    let mut schema = None;
    for arg in orm_args(&input.attrs)? {
        match &arg {
            OrmArg::Str(path, lit) if path.is_ident("table") => {
                name = Some(parse_sql_ident(lit, "table name")?);
            }
            OrmArg::Str(path, lit) if path.is_ident("schema") => {
                schema = Some(parse_sql_ident(lit, "schema name")?);
            }
            _ => return Err(unknown(&arg, "table = \"...\", schema = \"...\"")),
        }
    }
    let name = match name {
        Some(name) => name,
        None => parse_sql_ident_with_span(
            &input.ident.unraw().to_string().to_snake_case(),
            input.ident.span(),
            "table name",
        )?,
    };
    Ok(TableAttrs { name, schema })
}

fn parse_field_attrs(field: &syn::Field) -> Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();
    for arg in orm_args(&field.attrs)? {
        match &arg {
            OrmArg::Flag(path) if path.is_ident("id") => attrs.primary_key = true,
            OrmArg::Flag(path) if path.is_ident("auto_increment") => attrs.auto_increment = true,
            OrmArg::Flag(path) if path.is_ident("reference") => attrs.reference = true,
            OrmArg::Flag(path) if path.is_ident("skip") => attrs.skip = true,
            OrmArg::Str(path, lit) if path.is_ident("column") => {
                attrs.column = Some(parse_sql_ident(lit, "column name")?);
            }
            _ => {
                return Err(unknown(
                    &arg,
                    "id, auto_increment, reference, skip, column = \"...\"",
                ));
            }
        }
    }
    if attrs.reference && (attrs.primary_key || attrs.auto_increment || attrs.column.is_some()) {
        return Err(syn::Error::new_spanned(
            field,
            "a reference field has no column; it cannot also be id, auto_increment or renamed",
        ));
    }
    Ok(attrs)
}
