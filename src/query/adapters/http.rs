//! LLM client for OpenAI-compatible `/chat/completions` endpoints.

use async_trait::async_trait;
use minijinja::{Environment, context};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ingestion::domain::Vector;
use crate::query::ports::{Llm, LlmError, LlmResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const SYSTEM_PROMPT: &str = "You translate questions into PostgreSQL queries. \
Use only the tables and columns described in the schema context. \
Answer with one read-only SQL statement and nothing else.";

const USER_TEMPLATE: &str = "\
Schema context, one record per column:
{% for item in contexts %}{{ item }}
{% endfor %}
Question: {{ prompt }}
{% if feedback %}
Your previous attempt was rejected. Fix it.
{% for line in feedback %}- {{ line }}
{% endfor %}{% endif %}";

/// HTTP LLM rendering grounded prompts with a template.
#[derive(Debug, Clone)]
pub struct HttpLlm {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl HttpLlm {
    /// Creates a client for `base_url` (for example `http://host/v1`).
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Request`] when the HTTP client cannot be built.
    pub fn new(base_url: &str, model: impl Into<String>, api_key: Option<String>) -> LlmResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(LlmError::request)?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.into(),
            api_key,
        })
    }
}

/// Renders the user message for one generation attempt.
///
/// # Errors
///
/// Returns [`LlmError::Prompt`] when the template fails to render.
pub fn render_prompt(prompt: &str, contexts: &[Vector], feedback: &[String]) -> LlmResult<String> {
    let documents: Vec<&str> = contexts.iter().map(|vector| vector.content.as_str()).collect();
    Environment::new()
        .render_str(
            USER_TEMPLATE,
            context! {
                prompt => prompt,
                contexts => documents,
                feedback => feedback,
            },
        )
        .map_err(|err| LlmError::Prompt(err.to_string()))
}

/// Strips a surrounding Markdown code fence and its language tag.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(fenced) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = fenced
        .split_once('\n')
        .map_or(fenced, |(_, rest)| rest);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[async_trait]
impl Llm for HttpLlm {
    async fn generate_query(
        &self,
        prompt: &str,
        contexts: &[Vector],
        additional: &[String],
    ) -> LlmResult<String> {
        let user = render_prompt(prompt, contexts, additional)?;
        let mut request = self.client.post(&self.endpoint).json(&ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(LlmError::request)?;
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        let sql = strip_code_fence(&content);
        if sql.is_empty() {
            return Err(LlmError::InvalidResponse("completion carried no SQL".to_owned()));
        }
        Ok(sql.to_owned())
    }
}
