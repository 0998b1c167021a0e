use super::parts::SqlPart;
use super::params::ParamList;
use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::meta::TableDef;
use crate::value::Value;

/// A SQL fragment with its bound values kept in place.
///
/// `Sql` stores SQL pieces, parameters and column references separately.
/// Placeholders are numbered only when the fragment is rendered, so
/// fragments compiled independently can be composed in any order and the
/// final parameter list always matches placeholder order.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sql {
    parts: Vec<SqlPart>,
}

/// Options applied while turning [`Sql`] into text.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    pub dialect: &'a dyn Dialect,
    /// Qualify every column with its table name.
    pub prefix_columns: bool,
}

impl Sql {
    /// Create a new fragment with an initial SQL string.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        let initial_sql = initial_sql.into();
        if initial_sql.is_empty() {
            return Self::empty();
        }
        Self {
            parts: vec![SqlPart::Raw(initial_sql)],
        }
    }

    /// Create an empty fragment.
    pub fn empty() -> Self {
        Self { parts: Vec::new() }
    }

    /// A fragment holding a single bound value.
    pub fn bind(value: impl Into<Value>) -> Self {
        let mut sql = Self::empty();
        sql.push_bind(value);
        sql
    }

    /// A fragment holding a single column reference.
    pub fn column(table: &'static TableDef, column: &'static str) -> Self {
        let mut sql = Self::empty();
        sql.push_column(table, column);
        sql
    }

    /// `name(arg1, arg2, ...)`
    pub fn function(name: &str, args: impl IntoIterator<Item = Sql>) -> Self {
        let mut sql = Self::new(name);
        sql.push("(");
        sql.push_joined(args, ", ");
        sql.push(")");
        sql
    }

    /// Join fragments with a separator.
    pub fn join(items: impl IntoIterator<Item = Sql>, separator: &str) -> Self {
        let mut sql = Self::empty();
        sql.push_joined(items, separator);
        sql
    }

    /// Surround this fragment with `prefix` and `suffix`.
    pub fn wrap(self, prefix: &str, suffix: &str) -> Self {
        let mut sql = Self::new(prefix);
        sql.push_sql(self);
        sql.push(suffix);
        sql
    }

    /// Build a fragment from a template with `?` placeholders.
    ///
    /// Every `?` consumes the next value; the counts must match.
    pub fn template(template: &str, values: Vec<Value>) -> OrmResult<Self> {
        let expected = template.matches('?').count();
        if expected != values.len() {
            return Err(OrmError::validation(format!(
                "template has {expected} placeholder(s) but {} value(s) were given",
                values.len()
            )));
        }

        let mut sql = Self::empty();
        let mut values = values.into_iter();
        for (i, piece) in template.split('?').enumerate() {
            if i > 0 {
                if let Some(value) = values.next() {
                    sql.push_bind(value);
                }
            }
            sql.push(piece);
        }
        Ok(sql)
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(SqlPart::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(SqlPart::Raw(sql.to_string())),
        }
        self
    }

    /// Append a parameter placeholder and bind its value.
    pub fn push_bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.parts.push(SqlPart::Param(value.into()));
        self
    }

    /// Append a column reference.
    pub fn push_column(&mut self, table: &'static TableDef, column: &'static str) -> &mut Self {
        self.parts.push(SqlPart::Column { table, column });
        self
    }

    /// Append another fragment, consuming it.
    pub fn push_sql(&mut self, other: Sql) -> &mut Self {
        for part in other.parts {
            match part {
                SqlPart::Raw(s) => {
                    self.push(&s);
                }
                part => self.parts.push(part),
            }
        }
        self
    }

    /// Append fragments separated by `separator`.
    pub fn push_joined(&mut self, items: impl IntoIterator<Item = Sql>, separator: &str) -> &mut Self {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.push(separator);
            }
            self.push_sql(item);
        }
        self
    }

    /// Number of bound values in this fragment.
    pub fn param_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, SqlPart::Param(_)))
            .count()
    }

    /// Render to text, numbering placeholders from 1.
    pub fn render(&self, options: RenderOptions<'_>) -> (String, ParamList) {
        let mut out = String::with_capacity(self.estimated_len());
        let mut params = ParamList::new();
        self.render_into(options, &mut out, &mut params);
        (out, params)
    }

    /// Render into existing buffers, continuing placeholder numbering.
    pub fn render_into(&self, options: RenderOptions<'_>, out: &mut String, params: &mut ParamList) {
        let dialect = options.dialect;
        for part in &self.parts {
            match part {
                SqlPart::Raw(s) => out.push_str(s),
                SqlPart::Param(value) => {
                    let index = params.push(value.clone());
                    dialect.write_placeholder(out, index);
                }
                SqlPart::Column { table, column } => {
                    if options.prefix_columns {
                        out.push_str(&dialect.quote_ident(table.name));
                        out.push('.');
                    }
                    out.push_str(&dialect.quote_ident(column));
                }
            }
        }
    }

    fn estimated_len(&self) -> usize {
        self.parts
            .iter()
            .map(|part| match part {
                SqlPart::Raw(s) => s.len(),
                SqlPart::Param(_) => 4,
                SqlPart::Column { table, column } => table.name.len() + column.len() + 5,
            })
            .sum()
    }
}

/// Write a usize as decimal digits into `out` without going through fmt.
#[inline]
pub(crate) fn push_usize(out: &mut String, mut n: usize) {
    if n < 10 {
        out.push((b'0' + n as u8) as char);
        return;
    }
    let mut buf = [0u8; 20];
    let mut pos = buf.len();
    while n > 0 {
        pos -= 1;
        buf[pos] = b'0' + (n % 10) as u8;
        n /= 10;
    }
    for &digit in &buf[pos..] {
        out.push(digit as char);
    }
}
