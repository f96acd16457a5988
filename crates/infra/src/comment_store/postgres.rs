//! Postgres-backed comment store.
//!
//! The table is created on startup if it does not exist. Rows map one to one
//! onto [`ProductComment`]; `customer_id` is stored as its global id text.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;

use launchdesk_comments::{NewComment, ProductComment};
use launchdesk_core::{CommentId, CustomerGid};

use super::{CommentStore, CommentStoreError};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS product_comments (
    id          UUID PRIMARY KEY,
    product_id  TEXT NOT NULL,
    email       TEXT NOT NULL,
    text        TEXT NOT NULL,
    name        TEXT NOT NULL DEFAULT '',
    customer_id TEXT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS product_comments_created_at_idx
    ON product_comments (created_at DESC)
"#;

#[derive(Debug, Clone)]
pub struct PostgresCommentStore {
    pool: Arc<PgPool>,
}

impl PostgresCommentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect and make sure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, CommentStoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), CommentStoreError> {
        for statement in [CREATE_TABLE, CREATE_INDEX] {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> CommentStoreError {
    let message = match err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            Some(code) => format!("{} (code {code})", db_err.message()),
            None => db_err.message().to_string(),
        },
        sqlx::Error::PoolClosed => "connection pool closed".to_string(),
        other => other.to_string(),
    };
    CommentStoreError::Storage { operation, message }
}

#[derive(Debug)]
struct CommentRow {
    id: uuid::Uuid,
    product_id: String,
    email: String,
    text: String,
    name: String,
    customer_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for CommentRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(CommentRow {
            id: row.try_get("id")?,
            product_id: row.try_get("product_id")?,
            email: row.try_get("email")?,
            text: row.try_get("text")?,
            name: row.try_get("name")?,
            customer_id: row.try_get("customer_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl TryFrom<CommentRow> for ProductComment {
    type Error = CommentStoreError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        let customer_id = row
            .customer_id
            .filter(|c| !c.trim().is_empty())
            .map(|c| CustomerGid::new(c).map_err(|e| CommentStoreError::Corrupt(e.to_string())))
            .transpose()?;

        Ok(ProductComment {
            id: CommentId::from_uuid(row.id),
            product_id: row.product_id,
            email: row.email,
            text: row.text,
            name: row.name,
            customer_id,
            created_at: row.created_at,
        })
    }
}

#[async_trait::async_trait]
impl CommentStore for PostgresCommentStore {
    #[instrument(skip(self, comment), fields(product_id = %comment.product_id), err)]
    async fn create(&self, comment: NewComment) -> Result<ProductComment, CommentStoreError> {
        let stored = comment.into_comment(CommentId::new(), Utc::now());

        sqlx::query(
            r#"
            INSERT INTO product_comments
                (id, product_id, email, text, name, customer_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(stored.id.as_uuid())
        .bind(&stored.product_id)
        .bind(&stored.email)
        .bind(&stored.text)
        .bind(&stored.name)
        .bind(stored.customer_id.as_ref().map(|c| c.as_str()))
        .bind(stored.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create", e))?;

        Ok(stored)
    }

    #[instrument(skip(self), err)]
    async fn list_newest_first(&self) -> Result<Vec<ProductComment>, CommentStoreError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, product_id, email, text, name, customer_id, created_at
            FROM product_comments
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        rows.into_iter().map(ProductComment::try_from).collect()
    }

    #[instrument(skip(self), fields(comment_id = %id), err)]
    async fn delete(&self, id: CommentId) -> Result<bool, CommentStoreError> {
        let result = sqlx::query("DELETE FROM product_comments WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;
        Ok(result.rows_affected() > 0)
    }
}
