//! Scenario tests that run emitted statements against PostgreSQL.
//!
//! Skipped unless `DATABASE_URL` is set (a `.env` file is honored).

use chrono::{Datelike, NaiveDate};
use exprorm::prelude::*;
use std::error::Error;
use tokio_postgres::{Client, NoTls};
use tracing_subscriber::EnvFilter;

type TestResult = Result<(), Box<dyn Error + Send + Sync>>;

#[derive(Debug, Clone, Entity)]
#[orm(table = "scenario_author")]
struct Author {
    #[orm(id, auto_increment)]
    id: i64,
    name: String,
    birthday: NaiveDate,
    active: bool,
    earnings: f64,
    city: Option<String>,
}

const CITIES: [&str; 4] = ["Bogota", "Cartagena", "Medellin", "Cali"];

fn authors() -> Vec<Author> {
    let names = [
        "Garzon", "garzon", "GARZON", "Ruiz", "Lopez", "Diaz", "Perez", "Gomez", "Rojas", "Vargas",
        "Castro", "Ortiz", "Silva", "Mora",
    ];
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let i = i as i32;
            Author {
                id: 0,
                name: (*name).to_string(),
                birthday: NaiveDate::from_ymd_opt(1985 + i % 5, (i % 12 + 1) as u32, 10).unwrap(),
                active: i % 2 == 0,
                earnings: 1000.0 + f64::from(i) * 10.0,
                city: (i % 5 != 4).then(|| CITIES[(i % 4) as usize].to_string()),
            }
        })
        .collect()
}

async fn connect() -> Result<Option<Client>, Box<dyn Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping postgres scenarios");
            return Ok(None);
        }
    };

    let (client, connection) = tokio_postgres::connect(&database_url, NoTls).await?;
    tokio::spawn(async move {
        let _ = connection.await;
    });

    client
        .batch_execute(
            "CREATE TEMP TABLE scenario_author (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                birthday DATE NOT NULL,
                active BOOLEAN NOT NULL DEFAULT TRUE,
                earnings DOUBLE PRECISION NOT NULL DEFAULT 0,
                city TEXT
            )",
        )
        .await?;
    Ok(Some(client))
}

async fn seed(client: &Client) -> TestResult {
    let q = exprorm::from::<Author>(DialectKind::Postgres.build());
    for author in authors() {
        let built = q.to_insert_statement(&author)?;
        client.execute(&built.sql, &built.params_ref()).await?;
    }
    Ok(())
}

async fn count(client: &Client, q: &SqlExpression<Author>) -> Result<i64, Box<dyn Error + Send + Sync>> {
    let built = q.to_count_statement()?;
    let row = client.query_one(&built.sql, &built.params_ref()).await?;
    Ok(row.get(0))
}

async fn names(client: &Client, q: SqlExpression<Author>) -> Result<Vec<String>, Box<dyn Error + Send + Sync>> {
    let built = q.select(|a| a.name).to_select_statement()?;
    let rows = client.query(&built.sql, &built.params_ref()).await?;
    Ok(rows.iter().map(|r| r.get(0)).collect())
}

#[tokio::test]
async fn scenarios_against_postgres() -> TestResult {
    let Some(client) = connect().await? else {
        return Ok(());
    };
    seed(&client).await?;
    let base = exprorm::from::<Author>(DialectKind::Postgres.build());

    assert_eq!(count(&client, &base).await?, 14);

    // Case-insensitive suffix match.
    let q = base.clone().where_(|a| a.name.to_upper().ends_with("GARZON"));
    assert_eq!(count(&client, &q).await?, 3);
    let q = base.clone().where_(|a| a.name.ends_with("zon"));
    assert_eq!(count(&client, &q).await?, 3);

    // Range filter over one year.
    let jan1 = NaiveDate::from_ymd_opt(1987, 1, 1).unwrap();
    let dec31 = NaiveDate::from_ymd_opt(1987, 12, 31).unwrap();
    let built = base
        .clone()
        .where_(|a| a.birthday.gte(jan1) & a.birthday.lte(dec31))
        .select(|a| a.birthday)
        .to_select_statement()?;
    let rows = client.query(&built.sql, &built.params_ref()).await?;
    let expected = authors().iter().filter(|a| a.birthday.year() == 1987).count();
    assert_eq!(rows.len(), expected);
    assert!(rows.iter().all(|r| r.get::<_, NaiveDate>(0).year() == 1987));

    // Set membership, including the empty list.
    let q = base
        .clone()
        .where_(|a| func::in_list(a.city, vec!["Bogota", "Cartagena"]));
    let expected = authors()
        .iter()
        .filter(|a| matches!(a.city.as_deref(), Some("Bogota" | "Cartagena")))
        .count();
    assert_eq!(count(&client, &q).await? as usize, expected);
    let q = base.clone().where_(|a| a.city.in_list(Vec::<String>::new()));
    assert_eq!(count(&client, &q).await?, 0);

    // Paging returns rows 5..=8 of the ordering, every time.
    let all = names(&client, base.clone().order_by(|a| a.id)).await?;
    let paged = base.clone().order_by(|a| a.id).limit_skip(4, 4);
    let first = names(&client, paged.clone()).await?;
    let second = names(&client, paged).await?;
    assert_eq!(first, all[4..8].to_vec());
    assert_eq!(first, second);

    // Whitelisted insert leaves the other columns to their defaults.
    let extra = Author {
        id: 0,
        name: "Whitelisted".to_string(),
        birthday: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        active: false,
        earnings: 99.0,
        city: Some("Cali".to_string()),
    };
    let built = base
        .clone()
        .insert_fields(|a| (a.name, a.birthday))
        .to_insert_statement(&extra)?;
    client.execute(&built.sql, &built.params_ref()).await?;
    let built = base
        .clone()
        .where_(|a| a.name.eq("Whitelisted"))
        .select(|a| (a.active, a.earnings, a.city))
        .to_select_statement()?;
    let row = client.query_one(&built.sql, &built.params_ref()).await?;
    assert!(row.get::<_, bool>(0));
    assert_eq!(row.get::<_, f64>(1), 0.0);
    assert_eq!(row.get::<_, Option<String>>(2), None);

    // Update through a WHERE clause, then delete it.
    let built = base
        .clone()
        .where_(|a| a.name.eq("Whitelisted"))
        .update_fields(|a| a.earnings)
        .to_update_statement(&extra)?;
    assert_eq!(client.execute(&built.sql, &built.params_ref()).await?, 1);

    let built = base.clone().to_delete_statement()?;
    assert_eq!(client.execute(&built.sql, &built.params_ref()).await?, 0);
    let built = base
        .clone()
        .where_(|a| a.earnings.eq(99.0))
        .to_delete_statement()?;
    assert_eq!(client.execute(&built.sql, &built.params_ref()).await?, 1);

    // Aggregate scalar.
    let built = base.to_scalar_statement(|a| a.earnings.max())?;
    let row = client.query_one(&built.sql, &built.params_ref()).await?;
    assert_eq!(row.get::<_, f64>(0), 1130.0);

    Ok(())
}
