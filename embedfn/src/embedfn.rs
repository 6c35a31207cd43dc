use crate::config::{EmbedConfig, RawEmbedConfig};
use crate::error::EmbedFnError;

/// EmbeddingFunction is the contract a vector-database client expects from a
/// pluggable embedding component: build it from persisted config, read the
/// config back, vet partial updates, and turn text into vectors. Documents
/// and queries go through the same pipeline.
///
/// All implementations must be safe for concurrent use (Send + Sync).
/// Mutating one instance from several callers at once is not; that
/// synchronization is the caller's responsibility.
#[async_trait::async_trait]
pub trait EmbeddingFunction: Send + Sync {
    /// Validate `raw` and return a new, independently configured instance.
    /// The receiver is left untouched; a validation failure produces no
    /// instance at all.
    fn build_from_config(&self, raw: RawEmbedConfig) -> Result<Self, EmbedFnError>
    where
        Self: Sized;

    /// Snapshot copy of the persisted configuration fields, or `None` while
    /// unconfigured. The splitter is never part of the snapshot.
    fn config(&self) -> Option<EmbedConfig>;

    /// Check a partial update against the immutability rules without
    /// applying anything.
    fn validate_config_update(&self, update: &RawEmbedConfig) -> Result<(), EmbedFnError>;

    /// Split each text into chunks, send the chunks to the embedding
    /// service in consecutive batches, and return one vector per chunk in
    /// chunk production order. The vector count therefore depends on the
    /// splitter output, not on `texts.len()`; callers needing per-text
    /// grouping must regroup using their chunk counts.
    async fn generate(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedFnError>;

    /// Same pipeline as [`generate`](Self::generate); queries are not
    /// embedded differently.
    async fn generate_for_queries(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedFnError> {
        self.generate(texts).await
    }
}
