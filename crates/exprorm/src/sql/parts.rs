use crate::meta::TableDef;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SqlPart {
    /// SQL text emitted verbatim.
    Raw(String),
    /// A value bound at this position.
    Param(Value),
    /// A column reference; quoting and table prefix are decided at render time.
    Column {
        table: &'static TableDef,
        column: &'static str,
    },
}
