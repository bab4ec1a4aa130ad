//! Embeds a schema snapshot and replaces the tenant's vectors.

use crate::cancellation::{CancellationExt, Cancelled};
use crate::ingestion::{
    domain::{Vector, VectorId, VectorMetadata, column_documents},
    ports::{Embedder, EmbedderError, VectorStore, VectorStoreError},
};
use crate::status::ports::{StatusRegistry, StatusRegistryError};
use crate::tenant::TenantId;
use crate::workspace::{domain::SchemaMetadata, ports::ClientDatabaseError};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Service-level errors for ingestion.
#[derive(Debug, Error)]
pub enum IngestionServiceError {
    /// The metadata was not stamped with its tenant.
    #[error("schema metadata carries no tenant identifier")]
    MissingTenantId,
    /// Status registry operation failed.
    #[error(transparent)]
    Status(#[from] StatusRegistryError),
    /// Schema extraction from the client database failed.
    #[error(transparent)]
    ClientDatabase(#[from] ClientDatabaseError),
    /// Embedding failed.
    #[error(transparent)]
    Embedder(#[from] EmbedderError),
    /// Vector persistence failed.
    #[error(transparent)]
    VectorStore(#[from] VectorStoreError),
    /// The caller cancelled the ingestion.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

/// Result type for ingestion service operations.
pub type IngestionServiceResult<T> = Result<T, IngestionServiceError>;

/// Turns schema metadata into per-column vectors.
#[derive(Clone)]
pub struct IngestionService {
    status: Arc<dyn StatusRegistry>,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
}

impl IngestionService {
    /// Creates an ingestion service.
    #[must_use]
    pub const fn new(
        status: Arc<dyn StatusRegistry>,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            status,
            embedder,
            vector_store,
        }
    }

    /// Embeds every column of `metadata` and replaces the tenant's vectors.
    ///
    /// The tenant is marked `IN_PROGRESS` first. Embedding and vector store
    /// failures are recorded as `ERROR` with the failure message before the
    /// error is returned; success clears the status to `DONE`. Returns the
    /// number of vectors written, which equals the column count.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionServiceError::MissingTenantId`] for unstamped
    /// metadata, status, embedder, or vector store errors, or
    /// [`IngestionServiceError::Cancelled`] when `cancel` fires. Cancellation
    /// leaves the status untouched.
    pub async fn vectorize_and_store(
        &self,
        cancel: &CancellationToken,
        metadata: &SchemaMetadata,
    ) -> IngestionServiceResult<usize> {
        let tenant_id = metadata
            .tenant_id
            .as_ref()
            .ok_or(IngestionServiceError::MissingTenantId)?;

        cancel.guard(self.status.set_in_progress(tenant_id)).await??;
        info!(
            tenant_id = %tenant_id,
            tables = metadata.tables.len(),
            columns = metadata.column_count(),
            "schema ingestion started"
        );

        let documents = column_documents(tenant_id, metadata);
        let contents: Vec<String> = documents.iter().map(|doc| doc.content.clone()).collect();

        let embeddings = match cancel.guard(self.embedder.embed_batch(&contents)).await? {
            Ok(embeddings) if embeddings.len() == contents.len() => embeddings,
            Ok(embeddings) => {
                let mismatch = EmbedderError::CountMismatch {
                    expected: contents.len(),
                    actual: embeddings.len(),
                };
                return Err(self.record_failure(tenant_id, mismatch.into()).await);
            }
            Err(err) => return Err(self.record_failure(tenant_id, err.into()).await),
        };

        let vectors: Vec<Vector> = documents
            .into_iter()
            .zip(embeddings)
            .map(|(doc, embedding)| {
                let metadata_fields = VectorMetadata::from([
                    ("table".to_owned(), doc.table.clone()),
                    ("column".to_owned(), doc.column.clone()),
                    ("type".to_owned(), doc.data_type),
                ]);
                Vector {
                    id: VectorId::for_column(tenant_id, &doc.table, &doc.column),
                    tenant_id: tenant_id.clone(),
                    embedding,
                    content: doc.content,
                    metadata: metadata_fields,
                }
            })
            .collect();
        let written = vectors.len();

        if let Err(err) = cancel
            .guard(self.vector_store.upsert(tenant_id, vectors))
            .await?
        {
            return Err(self.record_failure(tenant_id, err.into()).await);
        }

        cancel.guard(self.status.set_done(tenant_id)).await??;
        info!(tenant_id = %tenant_id, vectors = written, "schema ingestion finished");
        Ok(written)
    }

    /// Records `error` as the tenant's `ERROR` status, best effort.
    pub(crate) async fn record_failure(
        &self,
        tenant_id: &TenantId,
        error: IngestionServiceError,
    ) -> IngestionServiceError {
        let message = error.to_string();
        warn!(tenant_id = %tenant_id, error = %message, "schema ingestion failed");
        if let Err(status_err) = self.status.set_error(tenant_id, &message).await {
            warn!(
                tenant_id = %tenant_id,
                error = %status_err,
                "failed to record ingestion error status"
            );
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::ports::{EmbedderResult, VectorStoreResult};
    use crate::status::domain::StatusRecord;
    use crate::status::ports::StatusRegistryResult;
    use crate::workspace::domain::{Column, Table};
    use async_trait::async_trait;
    use mockall::{Sequence, mock, predicate::eq};
    use rstest::{fixture, rstest};

    mock! {
        Registry {}

        #[async_trait]
        impl StatusRegistry for Registry {
            async fn set_in_progress(&self, tenant_id: &TenantId) -> StatusRegistryResult<()>;
            async fn set_done(&self, tenant_id: &TenantId) -> StatusRegistryResult<()>;
            async fn set_error(&self, tenant_id: &TenantId, message: &str) -> StatusRegistryResult<()>;
            async fn set_warn(&self, tenant_id: &TenantId, message: &str) -> StatusRegistryResult<()>;
            async fn get(&self, tenant_id: &TenantId) -> StatusRegistryResult<StatusRecord>;
            async fn clear(&self, tenant_id: &TenantId) -> StatusRegistryResult<()>;
        }
    }

    mock! {
        Embed {}

        #[async_trait]
        impl Embedder for Embed {
            async fn embed(&self, text: &str) -> EmbedderResult<Vec<f32>>;
            async fn embed_batch(&self, texts: &[String]) -> EmbedderResult<Vec<Vec<f32>>>;
        }
    }

    mock! {
        Vectors {}

        #[async_trait]
        impl VectorStore for Vectors {
            async fn upsert(&self, tenant_id: &TenantId, vectors: Vec<Vector>) -> VectorStoreResult<()>;
            async fn search(&self, tenant_id: &TenantId, embedding: &[f32], limit: usize) -> VectorStoreResult<Vec<Vector>>;
            async fn delete(&self, tenant_id: &TenantId) -> VectorStoreResult<()>;
            async fn exists(&self, tenant_id: &TenantId) -> VectorStoreResult<bool>;
        }
    }

    #[fixture]
    fn tenant_id() -> TenantId {
        TenantId::from_digest_prefix([0x42; 8])
    }

    fn metadata(tenant_id: &TenantId) -> SchemaMetadata {
        SchemaMetadata::new(
            vec![
                Table::new(
                    "users",
                    vec![Column::new("id", "integer").primary_key(), Column::new("email", "text")],
                ),
                Table::new("orders", vec![Column::new("total", "numeric")]),
            ],
            Vec::new(),
        )
        .with_tenant_id(tenant_id.clone())
    }

    fn service(registry: MockRegistry, embedder: MockEmbed, store: MockVectors) -> IngestionService {
        IngestionService::new(Arc::new(registry), Arc::new(embedder), Arc::new(store))
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn success_writes_one_vector_per_column_and_clears_status(tenant_id: TenantId) {
        let mut seq = Sequence::new();
        let mut registry = MockRegistry::new();
        registry
            .expect_set_in_progress()
            .with(eq(tenant_id.clone()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        let mut embedder = MockEmbed::new();
        embedder
            .expect_embed_batch()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|texts| Ok(texts.iter().map(|_| vec![0.5, 0.5]).collect()));
        let mut store = MockVectors::new();
        let expected_tenant = tenant_id.clone();
        store
            .expect_upsert()
            .times(1)
            .in_sequence(&mut seq)
            .withf(move |tenant, vectors| {
                tenant == &expected_tenant
                    && vectors.len() == 3
                    && vectors.iter().all(|v| &v.tenant_id == tenant)
                    && vectors
                        .first()
                        .is_some_and(|v| v.metadata.get("column").map(String::as_str) == Some("id"))
            })
            .returning(|_, _| Ok(()));
        registry
            .expect_set_done()
            .with(eq(tenant_id.clone()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        registry.expect_set_error().never();

        let written = service(registry, embedder, store)
            .vectorize_and_store(&CancellationToken::new(), &metadata(&tenant_id))
            .await
            .expect("ingestion should succeed");

        assert_eq!(written, 3);
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn embed_failure_records_error_and_skips_store(tenant_id: TenantId) {
        let mut registry = MockRegistry::new();
        registry.expect_set_in_progress().returning(|_| Ok(()));
        registry
            .expect_set_error()
            .withf(|_, message| message.contains("quota exceeded"))
            .times(1)
            .returning(|_, _| Ok(()));
        registry.expect_set_done().never();
        let mut embedder = MockEmbed::new();
        embedder.expect_embed_batch().returning(|_| {
            Err(EmbedderError::InvalidResponse("quota exceeded".to_owned()))
        });
        let mut store = MockVectors::new();
        store.expect_upsert().never();

        let result = service(registry, embedder, store)
            .vectorize_and_store(&CancellationToken::new(), &metadata(&tenant_id))
            .await;

        assert!(matches!(result, Err(IngestionServiceError::Embedder(_))));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn short_embedding_batch_is_a_handled_failure(tenant_id: TenantId) {
        let mut registry = MockRegistry::new();
        registry.expect_set_in_progress().returning(|_| Ok(()));
        registry
            .expect_set_error()
            .withf(|_, message| message.contains("expected 3, got 1"))
            .times(1)
            .returning(|_, _| Ok(()));
        let mut embedder = MockEmbed::new();
        embedder
            .expect_embed_batch()
            .returning(|_| Ok(vec![vec![1.0]]));
        let mut store = MockVectors::new();
        store.expect_upsert().never();

        let result = service(registry, embedder, store)
            .vectorize_and_store(&CancellationToken::new(), &metadata(&tenant_id))
            .await;

        assert!(matches!(
            result,
            Err(IngestionServiceError::Embedder(EmbedderError::CountMismatch { .. }))
        ));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn store_failure_returns_original_error_even_if_status_write_fails(tenant_id: TenantId) {
        let mut registry = MockRegistry::new();
        registry.expect_set_in_progress().returning(|_| Ok(()));
        registry.expect_set_error().times(1).returning(|_, _| {
            Err(StatusRegistryError::persistence(std::io::Error::other(
                "registry down",
            )))
        });
        registry.expect_set_done().never();
        let mut embedder = MockEmbed::new();
        embedder
            .expect_embed_batch()
            .returning(|texts| Ok(texts.iter().map(|_| vec![1.0]).collect()));
        let mut store = MockVectors::new();
        store.expect_upsert().returning(|_, _| {
            Err(VectorStoreError::persistence(std::io::Error::other("disk full")))
        });

        let result = service(registry, embedder, store)
            .vectorize_and_store(&CancellationToken::new(), &metadata(&tenant_id))
            .await;

        assert!(matches!(result, Err(IngestionServiceError::VectorStore(_))));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn in_progress_failure_aborts_before_embedding(tenant_id: TenantId) {
        let mut registry = MockRegistry::new();
        registry.expect_set_in_progress().returning(|_| {
            Err(StatusRegistryError::persistence(std::io::Error::other(
                "registry down",
            )))
        });
        registry.expect_set_error().never();
        let mut embedder = MockEmbed::new();
        embedder.expect_embed_batch().never();

        let result = service(registry, embedder, MockVectors::new())
            .vectorize_and_store(&CancellationToken::new(), &metadata(&tenant_id))
            .await;

        assert!(matches!(result, Err(IngestionServiceError::Status(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unstamped_metadata_is_rejected() {
        let mut registry = MockRegistry::new();
        registry.expect_set_in_progress().never();

        let result = service(registry, MockEmbed::new(), MockVectors::new())
            .vectorize_and_store(&CancellationToken::new(), &SchemaMetadata::default())
            .await;

        assert!(matches!(result, Err(IngestionServiceError::MissingTenantId)));
    }
}
