//! End-to-end statement scenarios over derived entities.
//!
//! These tests only inspect the emitted SQL and parameters; the Postgres
//! round-trips live in `postgres_scenarios.rs`.

#![allow(dead_code)]

use chrono::NaiveDate;
use exprorm::prelude::*;
use exprorm::{OrmError, SqlEnum, ValueKind};
use std::sync::Arc;

#[derive(Debug, Clone, Entity)]
#[orm(table = "author")]
struct Author {
    #[orm(id, auto_increment)]
    id: i64,
    name: String,
    birthday: NaiveDate,
    active: bool,
    earnings: f64,
    city: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, SqlEnum)]
enum Status {
    Draft,
    #[orm(rename = "live")]
    Published,
}

#[derive(Debug, Clone, Copy, PartialEq, SqlEnum)]
#[orm(repr = "int")]
enum Priority {
    Low = 1,
    High = 5,
}

#[derive(Debug, Clone, Entity)]
#[orm(table = "post", schema = "blog")]
struct Post {
    #[orm(id)]
    id: i64,
    author_id: i64,
    #[orm(column = "headline")]
    title: String,
    status: Status,
    priority: Priority,
    #[orm(reference)]
    author: Option<Author>,
    #[orm(skip)]
    cached_html: Option<String>,
}

fn pg() -> Arc<dyn Dialect> {
    DialectKind::Postgres.build()
}

fn author() -> Author {
    Author {
        id: 1,
        name: "Garzon".to_string(),
        birthday: NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
        active: true,
        earnings: 1200.5,
        city: Some("Bogota".to_string()),
    }
}

/// Number of `$n` placeholders in a Postgres statement.
fn placeholder_count(sql: &str) -> usize {
    sql.matches('$').count()
}

#[test]
fn derive_generates_metadata() {
    assert_eq!(Author::TABLE, "author");
    assert_eq!(Author::COL_BIRTHDAY, "birthday");
    assert_eq!(Post::COL_TITLE, "headline");

    let table = Post::table_def();
    assert_eq!(table.schema, Some("blog"));
    assert_eq!(table.columns.len(), 5);
    assert_eq!(table.references, &["author"]);
    assert!(table.column_for_field("cached_html").is_none());

    let status = table.column_for_field("status").unwrap();
    assert_eq!(status.kind, ValueKind::Enum(exprorm::EnumRepr::Text));
    let city = Author::table_def().column_for_field("city").unwrap();
    assert!(city.nullable);
    assert_eq!(city.kind, ValueKind::Text);
}

#[test]
fn sql_enum_values() {
    let Value::Enum(live) = Value::from(Status::Published) else {
        panic!("expected enum value");
    };
    assert_eq!(live.name, "live");
    assert_eq!(live.ordinal, 1);

    let Value::Enum(high) = Priority::High.to_value() else {
        panic!("expected enum value");
    };
    assert_eq!(high.ordinal, 5);
    assert_eq!(high.repr, exprorm::EnumRepr::Int);
}

#[test]
fn enum_literals_follow_column_repr() {
    let built = exprorm::from::<Post>(pg())
        .select(|p| p.id)
        .where_(|p| p.status.eq(Status::Published))
        .and(|p| p.priority.eq(Priority::High))
        .to_select_statement()
        .unwrap();
    assert_eq!(
        built.sql,
        r#"SELECT "id" FROM "blog"."post" WHERE ("status" = $1) AND ("priority" = $2)"#
    );
    assert_eq!(
        built.params.into_values(),
        vec![Value::from("live"), Value::Int(5)]
    );
}

#[test]
fn precedence_is_preserved() {
    let built = exprorm::from::<Author>(pg())
        .select(|a| a.id)
        .where_(|a| a.name.eq("x"))
        .or(|a| a.city.eq("y"))
        .and(|a| a.active)
        .to_select_statement()
        .unwrap();
    assert_eq!(
        built.sql,
        r#"SELECT "id" FROM "author" WHERE (("name" = $1) OR ("city" = $2)) AND ("active" = TRUE)"#
    );
}

#[test]
fn null_comparisons_bind_nothing() {
    let built = exprorm::from::<Author>(pg())
        .select(|a| a.id)
        .where_(|a| a.city.eq(None::<String>))
        .or(|a| a.city.ne(Value::Null))
        .to_select_statement()
        .unwrap();
    assert_eq!(
        built.sql,
        r#"SELECT "id" FROM "author" WHERE ("city" IS NULL) OR ("city" IS NOT NULL)"#
    );
    assert!(built.params.is_empty());
}

#[test]
fn upper_ends_with_matches_any_case() {
    for config in [
        QueryConfig::default(),
        QueryConfig::default().string_match(MatchCase::Sensitive),
    ] {
        let built = SqlExpression::<Author>::with_config(pg(), config)
            .select(|a| a.id)
            .where_(|a| a.name.to_upper().ends_with("GARZON"))
            .to_select_statement()
            .unwrap();
        assert_eq!(
            built.sql,
            r#"SELECT "id" FROM "author" WHERE UPPER("name") LIKE $1"#
        );
        assert_eq!(built.params.into_values(), vec![Value::from("%GARZON")]);
    }
}

#[test]
fn birthday_range_filter() {
    let jan1 = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
    let dec31 = NaiveDate::from_ymd_opt(1990, 12, 31).unwrap();
    let built = exprorm::from::<Author>(pg())
        .select(|a| a.name)
        .where_(|a| a.birthday.gte(jan1) & a.birthday.lte(dec31))
        .to_select_statement()
        .unwrap();
    assert_eq!(
        built.sql,
        r#"SELECT "name" FROM "author" WHERE ("birthday" >= $1) AND ("birthday" <= $2)"#
    );
    assert_eq!(
        built.params.into_values(),
        vec![Value::Date(jan1), Value::Date(dec31)]
    );
}

#[test]
fn set_membership() {
    let built = exprorm::from::<Author>(pg())
        .select(|a| a.id)
        .where_(|a| func::in_list(a.city, vec!["Bogota", "Cartagena"]))
        .to_select_statement()
        .unwrap();
    assert_eq!(
        built.sql,
        r#"SELECT "id" FROM "author" WHERE "city" IN ($1, $2)"#
    );

    let built = exprorm::from::<Author>(pg())
        .select(|a| a.id)
        .where_(|a| a.city.in_list(Vec::<String>::new()))
        .to_select_statement()
        .unwrap();
    assert_eq!(built.sql, r#"SELECT "id" FROM "author" WHERE "city" IN (NULL)"#);
    assert!(built.params.is_empty());
}

#[test]
fn paging_is_stable() {
    let q = exprorm::from::<Author>(DialectKind::Sqlite.build())
        .select(|a| a.id)
        .order_by(|a| a.id)
        .limit_skip(4, 4);
    let first = q.to_select_statement().unwrap();
    let second = q.to_select_statement().unwrap();
    assert_eq!(
        first.sql,
        r#"SELECT "id" FROM "author" ORDER BY "id" LIMIT 4 OFFSET 4"#
    );
    assert_eq!(first, second);
}

#[test]
fn whitelist_insert_names_only_selected_columns() {
    let built = exprorm::from::<Author>(pg())
        .insert_fields(|a| (a.id, a.name))
        .to_insert_statement(&author())
        .unwrap();
    assert_eq!(
        built.sql,
        r#"INSERT INTO "author" ("id", "name") VALUES ($1, $2)"#
    );
    assert_eq!(
        built.params.into_values(),
        vec![Value::Int(1), Value::from("Garzon")]
    );
}

#[test]
fn compilation_is_deterministic() {
    let build = || {
        exprorm::from::<Author>(pg())
            .where_(|a| a.name.contains("ar") | a.earnings.gt(100))
            .and(|a| a.city.in_list(["Bogota", "Cali"]))
            .order_by(|a| (a.name, a.birthday.desc()))
            .limit(10)
            .to_select_statement()
            .unwrap()
    };
    assert_eq!(build(), build());
}

#[test]
fn placeholders_align_with_params() {
    let built = exprorm::from::<Author>(pg())
        .select(|a| (a.id, (a.earnings * 1.1).alias("raised")))
        .where_(|a| a.name.starts_with("G") & a.birthday.gte(NaiveDate::from_ymd_opt(1980, 1, 1).unwrap()))
        .and(|a| func::iif::<String, _>(a.active, "yes", "no").eq("yes"))
        .and_template("earnings < ?", [5000.0])
        .to_select_statement()
        .unwrap();
    assert_eq!(placeholder_count(&built.sql), built.params.len());
    assert_eq!(built.params.len(), 7);
    for (i, _) in built.params.iter().enumerate() {
        assert!(built.sql.contains(&format!("${}", i + 1)));
    }
}

#[test]
fn other_dialects_render_their_own_syntax() {
    let q = |kind: DialectKind| {
        exprorm::from::<Author>(kind.build())
            .select(|a| a.name)
            .where_(|a| a.active)
            .order_by(|a| a.name)
            .limit_skip(10, 5)
            .to_select_statement()
            .unwrap()
            .sql
    };
    assert_eq!(
        q(DialectKind::MySql),
        "SELECT `name` FROM `author` WHERE `active` = 1 ORDER BY `name` LIMIT 5 OFFSET 10"
    );
    assert_eq!(
        q(DialectKind::SqlServer),
        "SELECT [name] FROM [author] WHERE [active] = 1 ORDER BY [name] OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"
    );
    assert_eq!(
        q(DialectKind::Oracle),
        r#"SELECT "name" FROM "author" WHERE "active" = 1 ORDER BY "name" OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"#
    );
}

#[test]
fn unknown_member_is_reported_at_emission() {
    let err = exprorm::from::<Post>(pg())
        .where_(|p| p.author.is_null())
        .to_select_statement()
        .unwrap_err();
    assert!(matches!(err, OrmError::ColumnNotFound { ref member, .. } if member == "author"));
}
