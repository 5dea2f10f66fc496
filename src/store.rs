// src/store.rs
//! SQLite persistence gateway for admitted articles.

use std::str::FromStr;

use anyhow::{Context, Result};
use metrics::counter;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::types::Article;

const CREATE_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS news_articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    publication_date TEXT,
    source TEXT NOT NULL,
    country TEXT NOT NULL,
    summary TEXT,
    url TEXT UNIQUE NOT NULL,
    language TEXT,
    category TEXT,
    fingerprint TEXT UNIQUE,
    ingested_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

const CREATE_INDEXES: [&str; 3] = [
    "CREATE INDEX IF NOT EXISTS idx_news_country ON news_articles(country)",
    "CREATE INDEX IF NOT EXISTS idx_news_source ON news_articles(source)",
    "CREATE INDEX IF NOT EXISTS idx_news_date ON news_articles(publication_date)",
];

/// Gateway to the article table. The table enforces uniqueness on `url`
/// and on `fingerprint`, the authoritative cross-run dedup line.
pub struct ArticleStore {
    pool: SqlitePool,
}

impl ArticleStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let opts = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("parsing database url {database_url}"))?
            .create_if_missing(true);

        // Single connection: SQLite serializes writers anyway, and it keeps
        // `sqlite::memory:` pointing at one database in tests.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .with_context(|| format!("opening article store at {database_url}"))?;

        Ok(Self { pool })
    }

    /// Create the table and indexes if absent. Bootstrap concern; a
    /// deployed store normally arrives with the schema in place.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .context("creating news_articles table")?;
        for stmt in CREATE_INDEXES {
            sqlx::query(stmt)
                .execute(&self.pool)
                .await
                .context("creating news_articles index")?;
        }
        tracing::info!("article store schema ready");
        Ok(())
    }

    /// Insert the batch, skipping any row whose url or fingerprint already
    /// exists. Returns the number of newly inserted rows; conflicts are
    /// counted and logged, never an error. Safe to call again with a batch
    /// persisted by a prior run.
    pub async fn upsert_batch(&self, articles: &[Article]) -> Result<u64> {
        let mut inserted = 0u64;
        let mut conflicts = 0u64;

        for article in articles {
            let result = sqlx::query(
                "INSERT INTO news_articles \
                 (title, publication_date, source, country, summary, url, language, category, fingerprint) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(&article.title)
            .bind(&article.publication_date)
            .bind(&article.source)
            .bind(&article.country)
            .bind(&article.summary)
            .bind(&article.url)
            .bind(&article.language)
            .bind(&article.category)
            .bind(&article.fingerprint)
            .execute(&self.pool)
            .await
            .with_context(|| format!("upserting article {}", article.url))?;

            if result.rows_affected() > 0 {
                inserted += 1;
            } else {
                conflicts += 1;
                tracing::debug!(url = %article.url, "article already stored, skipped");
            }
        }

        counter!("store_conflicts_total").increment(conflicts);
        tracing::info!(
            inserted,
            conflicts,
            batch = articles.len(),
            "persisted run batch"
        );
        Ok(inserted)
    }

    /// Total rows in the store; the read surface the export/API layer uses.
    pub async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM news_articles")
            .fetch_one(&self.pool)
            .await
            .context("counting stored articles")?;
        Ok(row.0)
    }
}
