//! Hand-written entities for unit tests (what `#[derive(Entity)]` would emit).

use crate::expr::Field;
use crate::meta::{ColumnDef, Entity, TableDef};
use crate::value::{EnumRepr, EnumValue, SqlType, Value, ValueKind};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Level {
    Junior,
    Senior,
}

impl From<Level> for Value {
    fn from(level: Level) -> Self {
        let (name, ordinal) = match level {
            Level::Junior => ("junior", 0),
            Level::Senior => ("senior", 1),
        };
        Value::Enum(EnumValue {
            type_name: "Level",
            name,
            ordinal,
            repr: EnumRepr::Int,
        })
    }
}

impl SqlType for Level {
    const KIND: ValueKind = ValueKind::Enum(EnumRepr::Int);

    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

const fn column(field: &'static str, name: &'static str, kind: ValueKind) -> ColumnDef {
    ColumnDef {
        field,
        name,
        kind,
        nullable: false,
        primary_key: false,
        auto_increment: false,
    }
}

const fn nullable(mut col: ColumnDef) -> ColumnDef {
    col.nullable = true;
    col
}

const fn id(field: &'static str) -> ColumnDef {
    let mut col = column(field, field, ValueKind::Int);
    col.primary_key = true;
    col.auto_increment = true;
    col
}

#[derive(Debug, Clone)]
pub(crate) struct Person {
    pub id: i64,
    pub name: String,
    pub city: Option<String>,
    pub age: i32,
    pub score: f64,
    pub active: bool,
    pub birthday: Option<NaiveDate>,
    pub level: Level,
}

pub(crate) static PERSON_TABLE: TableDef = TableDef {
    name: "people",
    schema: None,
    columns: &[
        id("id"),
        column("name", "first_name", ValueKind::Text),
        nullable(column("city", "city", ValueKind::Text)),
        column("age", "age", ValueKind::Int),
        column("score", "score", ValueKind::Float),
        column("active", "active", ValueKind::Bool),
        nullable(column("birthday", "birthday", ValueKind::Date)),
        column("level", "level", ValueKind::Enum(EnumRepr::Int)),
    ],
    references: &["orders"],
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct PersonFields {
    pub id: Field<Person, i64>,
    pub name: Field<Person, String>,
    pub city: Field<Person, Option<String>>,
    pub age: Field<Person, i32>,
    pub score: Field<Person, f64>,
    pub active: Field<Person, bool>,
    pub birthday: Field<Person, Option<NaiveDate>>,
    pub level: Field<Person, Level>,
    /// A reference field; it has no column.
    pub orders: Field<Person, i64>,
}

impl Entity for Person {
    type Fields = PersonFields;

    fn table_def() -> &'static TableDef {
        &PERSON_TABLE
    }

    fn fields() -> PersonFields {
        PersonFields {
            id: Field::new("id"),
            name: Field::new("name"),
            city: Field::new("city"),
            age: Field::new("age"),
            score: Field::new("score"),
            active: Field::new("active"),
            birthday: Field::new("birthday"),
            level: Field::new("level"),
            orders: Field::new("orders"),
        }
    }

    fn value_of(&self, field: &str) -> Option<Value> {
        Some(match field {
            "id" => self.id.to_value(),
            "name" => self.name.to_value(),
            "city" => self.city.to_value(),
            "age" => self.age.to_value(),
            "score" => self.score.to_value(),
            "active" => self.active.to_value(),
            "birthday" => self.birthday.to_value(),
            "level" => self.level.to_value(),
            _ => return None,
        })
    }
}

impl Person {
    pub fn sample() -> Self {
        Self {
            id: 7,
            name: "Ada".to_string(),
            city: None,
            age: 36,
            score: 9.5,
            active: true,
            birthday: NaiveDate::from_ymd_opt(1815, 12, 10),
            level: Level::Senior,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Order {
    pub id: i64,
    pub person_id: i64,
    pub total: f64,
}

pub(crate) static ORDER_TABLE: TableDef = TableDef {
    name: "orders",
    schema: Some("sales"),
    columns: &[
        id("id"),
        column("person_id", "person_id", ValueKind::Int),
        column("total", "total", ValueKind::Float),
    ],
    references: &[],
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct OrderFields {
    pub id: Field<Order, i64>,
    pub person_id: Field<Order, i64>,
    pub total: Field<Order, f64>,
}

impl Entity for Order {
    type Fields = OrderFields;

    fn table_def() -> &'static TableDef {
        &ORDER_TABLE
    }

    fn fields() -> OrderFields {
        OrderFields {
            id: Field::new("id"),
            person_id: Field::new("person_id"),
            total: Field::new("total"),
        }
    }

    fn value_of(&self, field: &str) -> Option<Value> {
        Some(match field {
            "id" => self.id.to_value(),
            "person_id" => self.person_id.to_value(),
            "total" => self.total.to_value(),
            _ => return None,
        })
    }
}

/// An entity without a primary key.
#[derive(Debug, Clone)]
pub(crate) struct AuditEntry {
    pub message: String,
}

pub(crate) static AUDIT_TABLE: TableDef = TableDef {
    name: "audit_log",
    schema: None,
    columns: &[column("message", "message", ValueKind::Text)],
    references: &[],
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct AuditFields {
    pub message: Field<AuditEntry, String>,
}

impl Entity for AuditEntry {
    type Fields = AuditFields;

    fn table_def() -> &'static TableDef {
        &AUDIT_TABLE
    }

    fn fields() -> AuditFields {
        AuditFields {
            message: Field::new("message"),
        }
    }

    fn value_of(&self, field: &str) -> Option<Value> {
        (field == "message").then(|| self.message.to_value())
    }
}
