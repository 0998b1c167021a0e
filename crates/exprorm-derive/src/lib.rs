//! Derive macros for exprorm
//!
//! Provides `#[derive(Entity)]` and `#[derive(SqlEnum)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod entity;
mod sql_enum;
mod sql_ident;

/// Derive `Entity` metadata and typed field handles for a struct.
///
/// # Example
///
/// ```ignore
/// use exprorm::prelude::*;
///
/// #[derive(Entity)]
/// #[orm(table = "people", schema = "crm")]
/// struct Person {
///     #[orm(id, auto_increment)]
///     id: i64,
///     #[orm(column = "first_name")]
///     name: String,
///     city: Option<String>,
///     #[orm(reference)]
///     orders: Vec<Order>,
/// }
/// ```
///
/// # Generated
///
/// - `PersonFields` - one `Field<Person, T>` per field, passed to builder closures
/// - `impl Entity for Person` with a static `TableDef`
/// - `TABLE: &'static str` and `COL_*: &'static str` constants
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Table name (default: snake_case struct name)
/// - `#[orm(schema = "name")]` - Schema qualifying the table
/// - `#[orm(id)]` - Mark field as (part of) the primary key
/// - `#[orm(auto_increment)]` - Value assigned by the database; skipped on insert
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(reference)]` - Related data, not a column
/// - `#[orm(skip)]` - Ignore the field entirely
#[proc_macro_derive(Entity, attributes(orm))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `SqlType` and `Into<Value>` for a unit-only enum.
///
/// # Example
///
/// ```ignore
/// #[derive(SqlEnum)]
/// #[orm(repr = "int")]
/// enum Level {
///     Junior,
///     #[orm(rename = "sr")]
///     Senior = 10,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(repr = "text" | "int")]` - Store the variant name (default) or ordinal
/// - `#[orm(rename = "name")]` - Stored name of a variant (default: snake_case)
#[proc_macro_derive(SqlEnum, attributes(orm))]
pub fn derive_sql_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    sql_enum::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
