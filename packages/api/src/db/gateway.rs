//! # Per-request storage gateway
//!
//! A [`Gateway`] is created for every request and owns at most one pooled
//! connection, acquired on first use. Reads run on that connection in
//! autocommit mode, so they never hold a lock past their own statement and
//! never make another request wait.
//!
//! The first write opens a transaction on the same connection. Later reads of
//! the request go through that transaction and see its writes. Writes become
//! visible to others only after [`Gateway::commit`]. Dropping the gateway (the
//! normal end of a request, an early `?` return, or a panic unwinding through
//! the handler) rolls an open transaction back and returns the connection to
//! the pool.

use sqlx::any::{AnyArguments, AnyRow};
use sqlx::pool::PoolConnection;
use sqlx::query::{Query, QueryAs, QueryScalar};
use sqlx::{Any, AnyConnection, AnyPool, FromRow, Transaction};

use crate::error::Result;

pub struct Gateway {
    pool: AnyPool,
    // At most one of these is set.
    conn: Option<PoolConnection<Any>>,
    tx: Option<Transaction<'static, Any>>,
}

impl Gateway {
    pub fn new(pool: AnyPool) -> Self {
        Self {
            pool,
            conn: None,
            tx: None,
        }
    }

    /// Whether a connection has been acquired for this request.
    pub fn is_open(&self) -> bool {
        self.conn.is_some() || self.tx.is_some()
    }

    /// Whether a write is pending commit.
    pub fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    /// The connection reads run on: the open transaction if any.
    async fn connection(&mut self) -> Result<&mut AnyConnection> {
        if let Some(tx) = self.tx.as_mut() {
            return Ok(&mut **tx);
        }
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => self.pool.acquire().await?,
        };
        Ok(&mut **self.conn.insert(conn))
    }

    async fn transaction(&mut self) -> Result<&mut Transaction<'static, Any>> {
        let tx = match (self.tx.take(), self.conn.take()) {
            (Some(tx), _) => tx,
            (None, Some(conn)) => Transaction::begin(conn, None).await?,
            (None, None) => self.pool.begin().await?,
        };
        Ok(self.tx.insert(tx))
    }

    /// Name of the driver behind the pool, e.g. `"PostgreSQL"` or `"SQLite"`.
    pub async fn backend_name(&mut self) -> Result<String> {
        let conn = self.connection().await?;
        Ok(conn.backend_name().to_string())
    }

    /// Run a write statement and return the number of affected rows.
    pub async fn execute<'q>(&mut self, query: Query<'q, Any, AnyArguments<'q>>) -> Result<u64> {
        let tx = self.transaction().await?;
        let done = query.execute(&mut **tx).await?;
        Ok(done.rows_affected())
    }

    /// Run an `INSERT ... RETURNING id` and return the new key.
    pub async fn insert<'q>(
        &mut self,
        query: QueryScalar<'q, Any, i64, AnyArguments<'q>>,
    ) -> Result<i64> {
        let tx = self.transaction().await?;
        Ok(query.fetch_one(&mut **tx).await?)
    }

    /// Fetch at most one row.
    pub async fn query_one<'q, T>(
        &mut self,
        query: QueryAs<'q, Any, T, AnyArguments<'q>>,
    ) -> Result<Option<T>>
    where
        T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
    {
        let conn = self.connection().await?;
        Ok(query.fetch_optional(conn).await?)
    }

    /// Fetch every matching row.
    pub async fn query_all<'q, T>(
        &mut self,
        query: QueryAs<'q, Any, T, AnyArguments<'q>>,
    ) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
    {
        let conn = self.connection().await?;
        Ok(query.fetch_all(conn).await?)
    }

    /// Fetch a single value such as a `COUNT(*)`.
    pub async fn query_scalar<'q, T>(
        &mut self,
        query: QueryScalar<'q, Any, T, AnyArguments<'q>>,
    ) -> Result<T>
    where
        (T,): for<'r> FromRow<'r, AnyRow>,
        T: Send + Unpin,
    {
        let conn = self.connection().await?;
        Ok(query.fetch_one(conn).await?)
    }

    /// Make every write of this request durable.
    ///
    /// Ends the current unit of work and releases the connection; a later
    /// call on this gateway acquires a new one.
    pub async fn commit(&mut self) -> Result<()> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
        }
        Ok(())
    }

    /// Discard every uncommitted write, e.g. after a statement failed.
    ///
    /// PostgreSQL refuses further statements in a failed transaction; the next
    /// call after a rollback starts a fresh one.
    pub async fn rollback(&mut self) -> Result<()> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema;
    use crate::testing::{file_pool, memory_pool};

    async fn patients_seen_by(gateway: &mut Gateway) -> i64 {
        gateway
            .query_scalar(sqlx::query_scalar("SELECT COUNT(*) FROM patients"))
            .await
            .unwrap()
    }

    async fn count_patients(pool: &AnyPool) -> i64 {
        patients_seen_by(&mut Gateway::new(pool.clone())).await
    }

    async fn insert_patient(gateway: &mut Gateway, email: &str) -> u64 {
        gateway
            .execute(
                sqlx::query(
                    "INSERT INTO patients (first_name, last_name, email, password_hash) \
                     VALUES ($1, $2, $3, $4)",
                )
                .bind("Ada")
                .bind("Lovelace")
                .bind(email.to_string())
                .bind("hash"),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_gateway_is_lazy() {
        let pool = memory_pool().await;
        let gateway = Gateway::new(pool.clone());
        assert!(!gateway.is_open());
    }

    #[tokio::test]
    async fn test_commit_persists_writes() {
        let pool = memory_pool().await;
        schema::initialize(&pool).await.unwrap();

        let mut gateway = Gateway::new(pool.clone());
        assert_eq!(insert_patient(&mut gateway, "ada@example.com").await, 1);
        assert!(gateway.is_open());
        gateway.commit().await.unwrap();
        assert!(!gateway.is_open());
        drop(gateway);

        assert_eq!(count_patients(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_drop_without_commit_rolls_back() {
        let pool = memory_pool().await;
        schema::initialize(&pool).await.unwrap();

        let mut gateway = Gateway::new(pool.clone());
        insert_patient(&mut gateway, "ada@example.com").await;
        drop(gateway);

        assert_eq!(count_patients(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_rollback_discards_and_reopens() {
        let pool = memory_pool().await;
        schema::initialize(&pool).await.unwrap();

        let mut gateway = Gateway::new(pool.clone());
        insert_patient(&mut gateway, "ada@example.com").await;
        gateway.rollback().await.unwrap();
        assert!(!gateway.is_open());

        insert_patient(&mut gateway, "grace@example.com").await;
        gateway.commit().await.unwrap();
        drop(gateway);

        assert_eq!(count_patients(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_query_one_absent() {
        let pool = memory_pool().await;
        schema::initialize(&pool).await.unwrap();

        let mut gateway = Gateway::new(pool.clone());
        let row: Option<(i64,)> = gateway
            .query_one(sqlx::query_as("SELECT id FROM patients WHERE id = $1").bind(42_i64))
            .await
            .unwrap();
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn test_reads_do_not_open_transaction() {
        let pool = memory_pool().await;
        schema::initialize(&pool).await.unwrap();

        let mut gateway = Gateway::new(pool.clone());
        assert_eq!(patients_seen_by(&mut gateway).await, 0);
        assert!(gateway.is_open());
        assert!(!gateway.in_transaction());

        insert_patient(&mut gateway, "ada@example.com").await;
        assert!(gateway.in_transaction());
        // Reads after a write see the pending row.
        assert_eq!(patients_seen_by(&mut gateway).await, 1);
    }

    #[tokio::test]
    async fn test_overlapping_gateways_both_write() {
        let dir = tempfile::tempdir().unwrap();
        let pool = file_pool(&dir).await;

        let mut first = Gateway::new(pool.clone());
        let mut second = Gateway::new(pool.clone());
        assert_eq!(patients_seen_by(&mut first).await, 0);
        assert_eq!(patients_seen_by(&mut second).await, 0);

        insert_patient(&mut second, "grace@example.com").await;
        assert_eq!(patients_seen_by(&mut first).await, 0);
        second.commit().await.unwrap();

        insert_patient(&mut first, "ada@example.com").await;
        first.commit().await.unwrap();
        drop((first, second));

        assert_eq!(count_patients(&pool).await, 2);
    }
}
