//! Shared fixtures for the store tests.
//!
//! Tests run against `DATABASE_URL` (a `.env` file is honoured). When it is not
//! set, each test returns early. Every test works inside a transaction that
//! truncates both tables, seeds the fixture rows and is rolled back at the end,
//! so point `DATABASE_URL` at a scratch database.

#![allow(dead_code)]

use rust_decimal::Decimal;
use tokio::sync::OnceCell;
use tokio_postgres::{Client, NoTls, Transaction};

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Seeded job ids, in insertion order (j1, j2, j3).
pub struct Seeded {
    pub job_ids: [i32; 3],
}

async fn open(url: &str) -> Client {
    let (client, connection) = tokio_postgres::connect(url, NoTls)
        .await
        .expect("connect to DATABASE_URL");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("connection error: {e}");
        }
    });
    client
}

/// A migrated connection, or `None` when no database is configured.
pub async fn connect() -> Option<Client> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping store test");
        return None;
    };

    let url_ref = url.as_str();
    MIGRATED
        .get_or_init(|| async move {
            let mut client = open(url_ref).await;
            jobly::migrate::run(&mut client).await.expect("migrations");
        })
        .await;

    Some(open(&url).await)
}

/// Replace the table contents with the fixture rows inside `tx`.
pub async fn seed(tx: &Transaction<'_>) -> Seeded {
    tx.batch_execute("TRUNCATE jobs, companies")
        .await
        .expect("truncate");

    for n in 1..=3_i32 {
        tx.execute(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url)
             VALUES ($1, $2, $3, $4, $5)",
            &[
                &format!("c{n}"),
                &format!("C{n}"),
                &format!("Desc{n}"),
                &n,
                &format!("http://c{n}.img"),
            ],
        )
        .await
        .expect("seed company");
    }

    let jobs: [(&str, i32, Decimal, &str); 3] = [
        ("J1", 100000, Decimal::ZERO, "c1"),
        ("J2", 80000, Decimal::new(2, 1), "c1"),
        ("J3", 40000, Decimal::ZERO, "c2"),
    ];
    let mut job_ids = [0; 3];
    for (slot, (title, salary, equity, handle)) in job_ids.iter_mut().zip(jobs) {
        let row = tx
            .query_one(
                "INSERT INTO jobs (title, salary, equity, company_handle)
                 VALUES ($1, $2, $3, $4) RETURNING id",
                &[&title, &salary, &equity, &handle],
            )
            .await
            .expect("seed job");
        *slot = row.get("id");
    }

    Seeded { job_ids }
}
