//! Prompt-to-query pipeline with bounded validation and execution retries.

use crate::cancellation::{CancellationExt, Cancelled};
use crate::config::QueryPipelineConfig;
use crate::error::{ApiError, STATUS_BAD_REQUEST, STATUS_CLIENT_CLOSED_REQUEST, STATUS_INTERNAL};
use crate::ingestion::{
    domain::Vector,
    ports::{Embedder, EmbedderError, VectorStore, VectorStoreError},
};
use crate::query::{
    domain::{Query, QueryOutcome, QueryWarning, Row},
    ports::{Llm, LlmError, QueryValidator},
};
use crate::status::ports::{StatusRegistry, StatusRegistryError};
use crate::tenant::TenantId;
use crate::workspace::{
    domain::Workspace,
    ports::{
        ClientConnection, ClientDatabase, UrlCipher, UrlCipherError, WorkspaceStore,
        WorkspaceStoreError,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Feedback sent to the LLM when the validator rejects without a reason.
const UNSAFE_VERDICT: &str = "query deemed unsafe by validator";

/// Service-level errors for query generation.
#[derive(Debug, Error)]
pub enum QueryPipelineError {
    /// Ingestion is running for the tenant.
    #[error("workspace ingestion is in progress for {0}")]
    StatusInProgress(TenantId),
    /// The prompt is blank.
    #[error("prompt must not be empty")]
    EmptyPrompt,
    /// Status registry operation failed.
    #[error(transparent)]
    Status(#[from] StatusRegistryError),
    /// Workspace store operation failed.
    #[error(transparent)]
    Store(#[from] WorkspaceStoreError),
    /// The stored client URL could not be decrypted.
    #[error(transparent)]
    Cipher(#[from] UrlCipherError),
    /// Prompt embedding failed.
    #[error(transparent)]
    Embedder(#[from] EmbedderError),
    /// Context search failed.
    #[error(transparent)]
    VectorStore(#[from] VectorStoreError),
    /// Query generation failed.
    #[error(transparent)]
    Llm(#[from] LlmError),
    /// The caller cancelled the request.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

/// Result type for query pipeline operations.
pub type QueryPipelineResult<T> = Result<T, QueryPipelineError>;

impl From<&QueryPipelineError> for ApiError {
    fn from(err: &QueryPipelineError) -> Self {
        match err {
            QueryPipelineError::StatusInProgress(tenant_id) => {
                Self::status_in_progress().with_info(tenant_id.as_str())
            }
            QueryPipelineError::EmptyPrompt => {
                Self::new(STATUS_BAD_REQUEST, "Invalid prompt").with_info(err.to_string())
            }
            QueryPipelineError::Cancelled(cancelled) => {
                Self::new(STATUS_CLIENT_CLOSED_REQUEST, "Request cancelled")
                    .with_info(cancelled.to_string())
            }
            other => {
                Self::new(STATUS_INTERNAL, "Query generation failed").with_info(other.to_string())
            }
        }
    }
}

/// Collaborators required by [`QueryPipeline`].
#[derive(Clone)]
pub struct QueryPorts {
    /// Ingestion status registry.
    pub status: Arc<dyn StatusRegistry>,
    /// Workspace persistence.
    pub store: Arc<dyn WorkspaceStore>,
    /// Stored URL decryption.
    pub cipher: Arc<dyn UrlCipher>,
    /// Client database connector.
    pub client_database: Arc<dyn ClientDatabase>,
    /// Prompt embedding.
    pub embedder: Arc<dyn Embedder>,
    /// Schema context search.
    pub vector_store: Arc<dyn VectorStore>,
    /// SQL generation.
    pub llm: Arc<dyn Llm>,
    /// SQL safety checks.
    pub validator: Arc<dyn QueryValidator>,
}

enum Candidate {
    Safe(String),
    Unsafe(String),
}

/// Turns natural-language prompts into validated, optionally executed SQL.
#[derive(Clone)]
pub struct QueryPipeline<C>
where
    C: Clock + Send + Sync,
{
    ports: QueryPorts,
    config: QueryPipelineConfig,
    clock: Arc<C>,
}

impl<C> QueryPipeline<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a pipeline.
    #[must_use]
    pub const fn new(ports: QueryPorts, config: QueryPipelineConfig, clock: Arc<C>) -> Self {
        Self {
            ports,
            config,
            clock,
        }
    }

    /// Returns the retry configuration.
    #[must_use]
    pub const fn config(&self) -> &QueryPipelineConfig {
        &self.config
    }

    /// Generates SQL for `prompt` and, when `with_data` is set, runs it.
    ///
    /// Degraded results are not errors: the generated SQL is always returned
    /// and [`QueryOutcome::warning`] says why no rows are attached. At most
    /// [`QueryPipelineConfig::max_generations`] LLM calls are made.
    ///
    /// # Errors
    ///
    /// Returns [`QueryPipelineError::EmptyPrompt`] for a blank prompt,
    /// [`QueryPipelineError::StatusInProgress`] while the tenant is
    /// being ingested, the failing collaborator's error for store, decrypt,
    /// embedding, search, or generation failures, or
    /// [`QueryPipelineError::Cancelled`] when `cancel` fires.
    pub async fn prompt_to_query_data(
        &self,
        cancel: &CancellationToken,
        tenant_id: &TenantId,
        prompt: &str,
        with_data: bool,
    ) -> QueryPipelineResult<QueryOutcome> {
        cancel.ensure_active()?;
        if prompt.trim().is_empty() {
            return Err(QueryPipelineError::EmptyPrompt);
        }
        let record = cancel.guard(self.ports.status.get(tenant_id)).await??;
        if record.is_in_progress() {
            return Err(QueryPipelineError::StatusInProgress(tenant_id.clone()));
        }

        cancel.guard(self.ports.store.connect()).await??;
        let workspace = cancel
            .guard(self.ports.store.find_by_tenant_id(tenant_id))
            .await??;
        let session = if with_data {
            self.open_session(cancel, tenant_id, workspace.as_ref())
                .await?
        } else {
            None
        };
        let warning = (with_data && session.is_none()).then_some(QueryWarning::WontExecute);

        let generated = self
            .generate_with_context(cancel, tenant_id, prompt, session.as_deref(), warning)
            .await;
        if let Some(connection) = session
            && let Err(close_err) = connection.close().await
        {
            warn!(tenant_id = %tenant_id, error = %close_err, "failed to close client database session");
        }
        generated
    }

    async fn open_session(
        &self,
        cancel: &CancellationToken,
        tenant_id: &TenantId,
        workspace: Option<&Workspace>,
    ) -> QueryPipelineResult<Option<Box<dyn ClientConnection>>> {
        let Some(registered) = workspace else {
            warn!(tenant_id = %tenant_id, "no workspace registered, query will not be executed");
            return Ok(None);
        };
        let db_url = self.ports.cipher.decrypt(registered.encrypted_db_url())?;
        match cancel
            .guard(self.ports.client_database.connect(&db_url))
            .await?
        {
            Ok(connection) => Ok(Some(connection)),
            Err(err) => {
                warn!(tenant_id = %tenant_id, error = %err, "client database unreachable, query will not be executed");
                Ok(None)
            }
        }
    }

    async fn generate_with_context(
        &self,
        cancel: &CancellationToken,
        tenant_id: &TenantId,
        prompt: &str,
        session: Option<&dyn ClientConnection>,
        warning: Option<QueryWarning>,
    ) -> QueryPipelineResult<QueryOutcome> {
        let embedding = cancel.guard(self.ports.embedder.embed(prompt)).await??;
        let contexts = cancel
            .guard(
                self.ports
                    .vector_store
                    .search(tenant_id, &embedding, self.config.context_limit),
            )
            .await??;
        debug!(tenant_id = %tenant_id, contexts = contexts.len(), "schema context retrieved");

        let mut feedback: Vec<String> = Vec::new();
        let mut last_query = String::new();
        for round in 0..=self.config.execution_retry_limit {
            let query = match self
                .generate_safe(cancel, prompt, &contexts, &mut feedback)
                .await?
            {
                Candidate::Safe(query) => query,
                Candidate::Unsafe(query) => {
                    warn!(tenant_id = %tenant_id, round, "no safe query within the repair budget");
                    return Ok(self.outcome(tenant_id, query, None, Some(QueryWarning::GeneratedUnsafe)));
                }
            };

            let Some(connection) = session else {
                return Ok(self.outcome(tenant_id, query, None, warning));
            };
            if self.ports.validator.contains_ddl_dml(&query) {
                warn!(tenant_id = %tenant_id, "generated query modifies data, not executing");
                return Ok(self.outcome(tenant_id, query, None, Some(QueryWarning::DdlDmlDetected)));
            }

            match cancel.guard(connection.execute(&query)).await? {
                Ok(rows) => {
                    info!(tenant_id = %tenant_id, rows = rows.len(), round, "generated query executed");
                    return Ok(self.outcome(tenant_id, query, Some(rows), warning));
                }
                Err(err) => {
                    warn!(tenant_id = %tenant_id, round, error = %err, "generated query failed to execute");
                    feedback = vec![query.clone(), err.to_string()];
                    last_query = query;
                }
            }
        }

        Ok(self.outcome(tenant_id, last_query, None, Some(QueryWarning::GeneratedUnsafe)))
    }

    /// Runs the validation repair loop.
    ///
    /// Stops at the first safe generation. When every attempt is rejected,
    /// one final generation is validated and returned either way.
    async fn generate_safe(
        &self,
        cancel: &CancellationToken,
        prompt: &str,
        contexts: &[Vector],
        feedback: &mut Vec<String>,
    ) -> QueryPipelineResult<Candidate> {
        for attempt in 0..=self.config.query_fix_attempts {
            let query = self
                .generate_once(cancel, prompt, contexts, feedback.as_slice())
                .await?;
            match self.ports.validator.is_safe(&query) {
                Ok(true) => return Ok(Candidate::Safe(query)),
                verdict => {
                    let reason = verdict
                        .err()
                        .map_or_else(|| UNSAFE_VERDICT.to_owned(), |err| err.to_string());
                    warn!(attempt, reason = %reason, "generated query rejected by validator");
                    *feedback = vec![query, reason];
                }
            }
        }

        let query = self
            .generate_once(cancel, prompt, contexts, feedback.as_slice())
            .await?;
        if matches!(self.ports.validator.is_safe(&query), Ok(true)) {
            Ok(Candidate::Safe(query))
        } else {
            Ok(Candidate::Unsafe(query))
        }
    }

    async fn generate_once(
        &self,
        cancel: &CancellationToken,
        prompt: &str,
        contexts: &[Vector],
        feedback: &[String],
    ) -> QueryPipelineResult<String> {
        cancel.ensure_active()?;
        debug!(feedback = !feedback.is_empty(), "requesting query generation");
        Ok(cancel
            .guard(self.ports.llm.generate_query(prompt, contexts, feedback))
            .await??)
    }

    fn outcome(
        &self,
        tenant_id: &TenantId,
        sql: String,
        rows: Option<Vec<Row>>,
        warning: Option<QueryWarning>,
    ) -> QueryOutcome {
        let query = Query::new(tenant_id.clone(), sql, rows, &*self.clock);
        QueryOutcome { query, warning }
    }
}
