//! Static entity metadata.
//!
//! [`TableDef`] and [`ColumnDef`] describe how an entity maps onto a table.
//! They are plain `'static` data, usually produced by `#[derive(Entity)]`,
//! and are shared read-only by every query built for the entity.

use crate::value::{Value, ValueKind};

/// Column information for a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Rust field (member) name.
    pub field: &'static str,
    /// Database column name.
    pub name: &'static str,
    /// Declared value kind.
    pub kind: ValueKind,
    /// Whether the column accepts `NULL`.
    pub nullable: bool,
    /// Whether this column is (part of) the primary key.
    pub primary_key: bool,
    /// Whether the database assigns the value on insert.
    pub auto_increment: bool,
}

/// Table information for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    /// Table name.
    pub name: &'static str,
    /// Schema name, if not the connection default.
    pub schema: Option<&'static str>,
    /// Mapped columns, in declaration order.
    pub columns: &'static [ColumnDef],
    /// Fields holding related entities; they have no column.
    pub references: &'static [&'static str],
}

impl TableDef {
    /// Look up the column mapped from a field name.
    pub fn column_for_field(&self, field: &str) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Look up a column by its database name.
    pub fn column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Primary key columns, in declaration order.
    pub fn primary_keys(&self) -> impl Iterator<Item = &'static ColumnDef> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    /// Whether `field` is a reference (non-column) field.
    pub fn is_reference(&self, field: &str) -> bool {
        self.references.contains(&field)
    }

    /// Two definitions describe the same table.
    pub fn same_table(&self, other: &TableDef) -> bool {
        std::ptr::eq(self, other) || (self.name == other.name && self.schema == other.schema)
    }
}

/// A type mapped onto a table.
///
/// This trait is automatically implemented by the `#[derive(Entity)]` macro.
pub trait Entity: Sized + 'static {
    /// Typed field handles passed to predicate and selector closures.
    type Fields;

    /// Static table metadata.
    fn table_def() -> &'static TableDef;

    /// A fresh set of field handles.
    fn fields() -> Self::Fields;

    /// Read the value of a mapped field from an instance.
    ///
    /// Returns `None` for unknown fields.
    fn value_of(&self, field: &str) -> Option<Value>;
}
