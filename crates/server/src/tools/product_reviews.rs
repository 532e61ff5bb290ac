//! product_reviews tool implementation.
//!
//! Read-back over the review archive: everything stored for one product id.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use sentio_core::{Error, ReviewStore, StoredReview};

/// Input parameters for the product_reviews tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProductReviewsParams {
    /// Product id, as derived by analyze_reviews (pid parameter or URL hash).
    pub product_id: String,
}

/// Output structure for the product_reviews tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProductReviewsOutput {
    pub product_id: String,
    pub total: usize,
    pub reviews: Vec<StoredReview>,
}

/// Implementation of the product_reviews tool.
pub async fn product_reviews_impl(store: &ReviewStore, params: ProductReviewsParams) -> Result<CallToolResult, McpError> {
    if params.product_id.trim().is_empty() {
        return Err(Error::InvalidInput("product_id cannot be empty".into()).into());
    }

    let reviews = store.reviews_for_product(&params.product_id).await.map_err(McpError::from)?;

    let output = ProductReviewsOutput { product_id: params.product_id, total: reviews.len(), reviews };

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).unwrap_or_default(),
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_product_id_rejected() {
        let store = ReviewStore::open_in_memory().await.unwrap();
        let result = product_reviews_impl(&store, ProductReviewsParams { product_id: "  ".into() }).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_reads_back_archived_rows() {
        let store = ReviewStore::open_in_memory().await.unwrap();
        store
            .insert_reviews("XYZ", &[("the battery life is excellent.".to_string(), 0.9)])
            .await
            .unwrap();

        let result = product_reviews_impl(&store, ProductReviewsParams { product_id: "XYZ".into() })
            .await
            .unwrap();
        assert!(!result.is_error.unwrap_or(false));
    }
}
