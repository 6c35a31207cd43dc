use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{
    EmbedConfig, FIELD_CHUNK_SIZE, RawEmbedConfig, Splitter, optional_count, validate_config,
    validate_config_update,
};
use crate::embedfn::EmbeddingFunction;
use crate::error::EmbedFnError;

/// Batch size used when the configuration does not set chunkSize.
pub const DEFAULT_CHUNK_SIZE: usize = 2048;

/// Wire default when the configuration does not set encodingFormat.
const DEFAULT_ENCODING_FORMAT: &str = "float";

/// Request body understood by OpenAI-compatible embedding endpoints.
#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    encoding_format: &'a str,
}

/// Response body: one embedding per input chunk, in request order.
#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Embedding function backed by a remote OpenAI-compatible HTTP service.
///
/// An instance is either empty (no configuration yet) or holds exactly one
/// fully validated configuration snapshot; once configured it never goes
/// back to empty. Batches are sent sequentially, one at a time, so results
/// are never reordered across batches. No retry, no internal timeout; wrap
/// calls in an HTTP-level timeout if one is needed.
pub struct RemoteEmbeddingFunction {
    client: Client,
    config: Option<EmbedConfig>,
    splitter: Option<Splitter>,
}

impl std::fmt::Debug for RemoteEmbeddingFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteEmbeddingFunction")
            .field("config", &self.config)
            .field("splitter", &self.splitter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl RemoteEmbeddingFunction {
    /// Create an empty, not-yet-configured instance. Generating vectors
    /// before a configuration is set fails with
    /// [`EmbedFnError::Unconfigured`].
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            config: None,
            splitter: None,
        }
    }

    /// Create an instance from raw configuration, running full validation.
    /// On failure no instance is produced.
    pub fn with_config(raw: RawEmbedConfig) -> Result<Self, EmbedFnError> {
        let config = validate_config(&raw)?;
        Ok(Self {
            client: Client::new(),
            config: Some(config),
            splitter: raw.splitter,
        })
    }

    /// Validate `update` and apply the mutable fields (chunkSize, splitter)
    /// to the stored configuration. Nothing is changed when validation
    /// fails or when the instance is still unconfigured.
    pub fn update_config(&mut self, update: RawEmbedConfig) -> Result<(), EmbedFnError> {
        validate_config_update(&update)?;
        let Some(config) = self.config.as_mut() else {
            return Err(EmbedFnError::Unconfigured);
        };
        if let Some(size) = optional_count(FIELD_CHUNK_SIZE, &update.chunk_size, 1)? {
            config.chunk_size = Some(size);
        }
        if let Some(splitter) = update.splitter {
            self.splitter = Some(splitter);
        }
        Ok(())
    }

    /// One POST for one batch of chunks. Non-2xx fails hard with the status
    /// code and status text; a success response must carry exactly one
    /// vector per chunk.
    async fn call_service(
        &self,
        config: &EmbedConfig,
        batch: &[String],
    ) -> Result<Vec<Vec<f32>>, EmbedFnError> {
        let body = EmbeddingRequest {
            model: &config.model,
            input: batch,
            encoding_format: config
                .encoding_format
                .as_deref()
                .unwrap_or(DEFAULT_ENCODING_FORMAT),
        };

        let resp = self
            .client
            .post(&config.service_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmbedFnError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(EmbedFnError::RemoteService {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let parsed: EmbeddingResponse = resp
            .json()
            .await
            .map_err(|e| EmbedFnError::Transport(e.to_string()))?;

        if parsed.data.len() != batch.len() {
            return Err(EmbedFnError::CountMismatch {
                expected: batch.len(),
                got: parsed.data.len(),
            });
        }

        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

impl Default for RemoteEmbeddingFunction {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EmbeddingFunction for RemoteEmbeddingFunction {
    fn build_from_config(&self, raw: RawEmbedConfig) -> Result<Self, EmbedFnError> {
        Self::with_config(raw)
    }

    fn config(&self) -> Option<EmbedConfig> {
        self.config.clone()
    }

    fn validate_config_update(&self, update: &RawEmbedConfig) -> Result<(), EmbedFnError> {
        validate_config_update(update)
    }

    async fn generate(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedFnError> {
        let config = self.config.as_ref().ok_or(EmbedFnError::Unconfigured)?;

        // One flat chunk list: input order, then each text's split order.
        // Without a splitter every text is its own chunk.
        let mut chunks: Vec<String> = Vec::with_capacity(texts.len());
        for text in texts {
            match &self.splitter {
                Some(split) => chunks.extend(split(text)),
                None => chunks.push((*text).to_string()),
            }
        }

        let batch_size = config.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE);
        debug!(
            model = %config.model,
            chunks = chunks.len(),
            batch_size,
            "embedding generate"
        );

        // Batches go out strictly one after another; a failed batch aborts
        // the whole call and earlier results are discarded.
        let mut vectors = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(batch_size) {
            let vecs = self.call_service(config, batch).await?;
            vectors.extend(vecs);
        }

        debug!(vectors = vectors.len(), "embedding generate done");
        Ok(vectors)
    }
}
