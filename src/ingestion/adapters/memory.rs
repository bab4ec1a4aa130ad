//! In-memory vector store with brute-force cosine search.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ingestion::{
    domain::Vector,
    ports::{VectorStore, VectorStoreError, VectorStoreResult},
};
use crate::tenant::TenantId;

/// Thread-safe in-memory vector index partitioned by tenant.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVectorStore {
    vectors: Arc<RwLock<HashMap<TenantId, Vec<Vector>>>>,
}

impl InMemoryVectorStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> VectorStoreError {
    VectorStoreError::persistence(std::io::Error::other(err.to_string()))
}

/// Cosine similarity; zero for empty, mismatched, or zero-norm inputs.
#[expect(
    clippy::float_arithmetic,
    reason = "similarity scoring is inherently floating point"
)]
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }
    dot / denom
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, tenant_id: &TenantId, vectors: Vec<Vector>) -> VectorStoreResult<()> {
        if let Some(stray) = vectors.iter().find(|vector| &vector.tenant_id != tenant_id) {
            return Err(VectorStoreError::TenantMismatch {
                tenant_id: tenant_id.clone(),
                vector_tenant: stray.tenant_id.clone(),
            });
        }
        let mut store = self.vectors.write().map_err(poisoned)?;
        store.insert(tenant_id.clone(), vectors);
        Ok(())
    }

    async fn search(
        &self,
        tenant_id: &TenantId,
        embedding: &[f32],
        limit: usize,
    ) -> VectorStoreResult<Vec<Vector>> {
        let store = self.vectors.read().map_err(poisoned)?;
        let Some(vectors) = store.get(tenant_id) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<(f32, &Vector)> = vectors
            .iter()
            .map(|vector| (cosine_similarity(embedding, &vector.embedding), vector))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(_, vector)| vector.clone())
            .collect())
    }

    async fn delete(&self, tenant_id: &TenantId) -> VectorStoreResult<()> {
        let mut store = self.vectors.write().map_err(poisoned)?;
        store.remove(tenant_id);
        Ok(())
    }

    async fn exists(&self, tenant_id: &TenantId) -> VectorStoreResult<bool> {
        let store = self.vectors.read().map_err(poisoned)?;
        Ok(store.get(tenant_id).is_some_and(|vectors| !vectors.is_empty()))
    }
}
