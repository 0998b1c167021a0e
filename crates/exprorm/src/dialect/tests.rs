use super::*;
use chrono::NaiveDate;

#[test]
fn identifier_quoting() {
    assert_eq!(PostgresDialect::new().quote_ident("name"), r#""name""#);
    assert_eq!(MySqlDialect::new().quote_ident("name"), "`name`");
    assert_eq!(SqlServerDialect::new().quote_ident("name"), "[name]");
    assert_eq!(OracleDialect::new().quote_ident("na\"me"), r#""na""me""#);
}

#[test]
fn bool_literals() {
    assert_eq!(PostgresDialect::new().bool_literal(true), "TRUE");
    assert_eq!(SqliteDialect::new().bool_literal(false), "0");
    assert_eq!(SqlServerDialect::new().bool_literal(true), "1");
}

#[test]
fn string_literals_escape_quotes() {
    let v = Value::from("O'Brien");
    assert_eq!(PostgresDialect::new().quote_value(&v).unwrap(), "'O''Brien'");
    assert_eq!(SqlServerDialect::new().quote_value(&v).unwrap(), "N'O''Brien'");
    assert_eq!(
        MySqlDialect::new().quote_value(&Value::from(r"a\b")).unwrap(),
        r"'a\\b'"
    );
}

#[test]
fn temporal_and_binary_literals() {
    let date = Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    assert_eq!(PostgresDialect::new().quote_value(&date).unwrap(), "'2024-02-29'");
    assert_eq!(OracleDialect::new().quote_value(&date).unwrap(), "DATE '2024-02-29'");

    let bytes = Value::Bytes(vec![0xde, 0xad]);
    assert_eq!(SqliteDialect::new().quote_value(&bytes).unwrap(), "X'DEAD'");
    assert_eq!(SqlServerDialect::new().quote_value(&bytes).unwrap(), "0xDEAD");
    assert_eq!(PostgresDialect::new().quote_value(&bytes).unwrap(), r"'\xDEAD'::bytea");
}

#[test]
fn enum_literal_follows_repr() {
    let text = EnumValue {
        type_name: "Status",
        name: "active",
        ordinal: 2,
        repr: EnumRepr::Text,
    };
    let int = EnumValue {
        repr: EnumRepr::Int,
        ..text
    };
    let d = PostgresDialect::new();
    assert_eq!(d.quote_value(&Value::Enum(text)).unwrap(), "'active'");
    assert_eq!(d.quote_value(&Value::Enum(int)).unwrap(), "2");
}

#[test]
fn non_finite_float_is_rejected() {
    let err = PostgresDialect::new()
        .quote_value(&Value::Float(f64::NAN))
        .unwrap_err();
    assert!(matches!(err, OrmError::InvalidValue(_)));
}

#[test]
fn list_cannot_be_quoted() {
    let err = PostgresDialect::new()
        .quote_value(&Value::list([1, 2]))
        .unwrap_err();
    assert!(matches!(err, OrmError::InvalidValue(_)));
}

#[test]
fn paging_per_dialect() {
    assert_eq!(
        PostgresDialect::new().limit_clause(Some(4), Some(4), true).as_deref(),
        Some(" LIMIT 4 OFFSET 4")
    );
    assert_eq!(
        SqliteDialect::new().limit_clause(None, Some(3), false).as_deref(),
        Some(" LIMIT -1 OFFSET 3")
    );
    assert_eq!(
        SqlServerDialect::new().limit_clause(Some(10), None, false).as_deref(),
        Some(" ORDER BY (SELECT NULL) OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY")
    );
    assert_eq!(
        OracleDialect::new().limit_clause(Some(10), Some(20), true).as_deref(),
        Some(" OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY")
    );
    assert_eq!(PostgresDialect::new().limit_clause(None, None, false), None);
}

#[test]
fn modulo_on_oracle_is_a_function() {
    let d = OracleDialect::new();
    let sql = d.modulo(Sql::new("a"), Sql::new("b"));
    let (text, _) = sql.render(crate::sql::RenderOptions {
        dialect: &d,
        prefix_columns: false,
    });
    assert_eq!(text, "MOD(a, b)");
}

#[test]
fn kind_builds_matching_dialect() {
    for kind in [
        DialectKind::Postgres,
        DialectKind::Sqlite,
        DialectKind::MySql,
        DialectKind::SqlServer,
        DialectKind::Oracle,
    ] {
        let dialect = kind.build();
        assert_eq!(dialect.kind(), kind);
        assert_eq!(dialect.string_match(), MatchCase::Insensitive);
    }
    let sensitive = DialectKind::Sqlite.build_with(MatchCase::Sensitive);
    assert_eq!(sensitive.string_match(), MatchCase::Sensitive);
}
