//! Review row operations.
//!
//! Insert-only from the analysis pipeline; the read-back query exists for
//! the `product_reviews` tool and for tests.

use super::connection::ReviewStore;
use crate::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;

/// An archived review row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoredReview {
    pub id: i64,
    pub product_id: String,
    pub review_text: String,
    /// Positivity score at analysis time, in [0, 1].
    pub sentiment: f64,
    pub created_at: String,
}

impl ReviewStore {
    /// Archive a batch of analyzed reviews under one product key.
    ///
    /// Returns the number of rows written. One timestamp is stamped per
    /// batch so a request's rows are groupable later.
    pub async fn insert_reviews(&self, product_id: &str, rows: &[(String, f64)]) -> Result<usize, Error> {
        if rows.is_empty() {
            return Ok(0);
        }

        let product_id = product_id.to_string();
        let rows = rows.to_vec();
        let created_at = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<usize, Error> {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO reviews (product_id, review_text, sentiment, created_at)
                         VALUES (?1, ?2, ?3, ?4)",
                    )?;
                    for (text, sentiment) in &rows {
                        stmt.execute(params![product_id, text, sentiment, created_at])?;
                    }
                }
                tx.commit()?;
                Ok(rows.len())
            })
            .await
            .map_err(Error::from)
    }

    /// All archived reviews for a product, oldest first.
    pub async fn reviews_for_product(&self, product_id: &str) -> Result<Vec<StoredReview>, Error> {
        let product_id = product_id.to_string();

        self.conn
            .call(move |conn| -> Result<Vec<StoredReview>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT id, product_id, review_text, sentiment, created_at
                     FROM reviews WHERE product_id = ?1 ORDER BY id ASC",
                )?;

                let rows = stmt
                    .query_map(params![product_id], |row| {
                        Ok(StoredReview {
                            id: row.get(0)?,
                            product_id: row.get(1)?,
                            review_text: row.get(2)?,
                            sentiment: row.get(3)?,
                            created_at: row.get(4)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(rows)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let store = ReviewStore::open_in_memory().await.unwrap();
        let rows = vec![("great battery life.".to_string(), 0.9), ("screen died fast.".to_string(), 0.2)];

        let written = store.insert_reviews("ABC123", &rows).await.unwrap();
        assert_eq!(written, 2);

        let stored = store.reviews_for_product("ABC123").await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].review_text, "great battery life.");
        assert!((stored[1].sentiment - 0.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_batch_writes_nothing() {
        let store = ReviewStore::open_in_memory().await.unwrap();
        let written = store.insert_reviews("ABC123", &[]).await.unwrap();
        assert_eq!(written, 0);
        assert!(store.reviews_for_product("ABC123").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_products_are_isolated() {
        let store = ReviewStore::open_in_memory().await.unwrap();
        store
            .insert_reviews("A", &[("first product review text.".to_string(), 0.8)])
            .await
            .unwrap();
        store
            .insert_reviews("B", &[("second product review text.".to_string(), 0.3)])
            .await
            .unwrap();

        let a = store.reviews_for_product("A").await.unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].product_id, "A");
    }
}
