//! Configuration types and validation.
//!
//! Raw configuration arrives untyped (one `serde_json::Value` per field) and
//! is validated field by field before anything is stored. Only a config that
//! passed full validation becomes an [`EmbedConfig`] snapshot; there is no
//! partially-valid state.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::EmbedFnError;

/// Splits one input text into the chunks that get embedded.
///
/// The chunking algorithm is entirely the caller's; validation only requires
/// that a supplied splitter is callable, which the type already guarantees.
pub type Splitter = Arc<dyn Fn(&str) -> Vec<String> + Send + Sync>;

// Persisted field names, exactly as the host stores and displays them.
// These appear verbatim in validation error messages.
pub(crate) const FIELD_SERVICE_URL: &str = "serviceUrl";
pub(crate) const FIELD_MODEL: &str = "model";
pub(crate) const FIELD_ENCODING_FORMAT: &str = "encodingFormat";
pub(crate) const FIELD_CHUNK_SIZE: &str = "chunkSize";
pub(crate) const FIELD_CHUNK_OVERLAP: &str = "chunkOverlap";
pub(crate) const FIELD_CHUNK_STRATEGY: &str = "chunkStrategy";

/// Keeps an explicit JSON `null` distinguishable from a missing key: a
/// present key always deserializes to `Some`, even when its value is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Raw, not-yet-validated configuration input.
///
/// Every data field holds the untyped JSON value as supplied (missing key =
/// `None`), so validation can report type errors per field. The splitter is
/// a function and never part of the serialized form. Unknown keys in input
/// JSON are ignored.
///
/// The same type carries partial updates: fields left `None` mean "no change
/// requested".
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEmbedConfig {
    #[serde(default, deserialize_with = "present")]
    pub service_url: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub model: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub encoding_format: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub chunk_size: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub chunk_overlap: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub chunk_strategy: Option<Value>,
    #[serde(skip)]
    pub splitter: Option<Splitter>,
}

impl RawEmbedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service_url(mut self, url: &str) -> Self {
        self.service_url = Some(Value::from(url));
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(Value::from(model));
        self
    }

    pub fn with_encoding_format(mut self, format: &str) -> Self {
        self.encoding_format = Some(Value::from(format));
        self
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(Value::from(size));
        self
    }

    pub fn with_chunk_overlap(mut self, overlap: usize) -> Self {
        self.chunk_overlap = Some(Value::from(overlap));
        self
    }

    pub fn with_chunk_strategy(mut self, strategy: &str) -> Self {
        self.chunk_strategy = Some(Value::from(strategy));
        self
    }

    pub fn with_splitter(mut self, splitter: Splitter) -> Self {
        self.splitter = Some(splitter);
        self
    }
}

/// Validated configuration snapshot: the six persisted fields.
///
/// The splitter is deliberately not part of the snapshot; it is not plain
/// data and is held by the adapter instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedConfig {
    pub service_url: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_overlap: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_strategy: Option<String>,
}

// A missing key and an explicit JSON null both count as "absent" for the
// required and optional checks. The update check is stricter: any present
// key, null included, is a change request.

fn required_string(field: &'static str, value: &Option<Value>) -> Result<String, EmbedFnError> {
    match value {
        None | Some(Value::Null) => Err(EmbedFnError::MissingField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(EmbedFnError::InvalidField(field)),
    }
}

fn optional_string(
    field: &'static str,
    value: &Option<Value>,
) -> Result<Option<String>, EmbedFnError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(EmbedFnError::InvalidField(field)),
    }
}

/// Integral JSON number, at least `min`, representable as usize.
pub(crate) fn optional_count(
    field: &'static str,
    value: &Option<Value>,
    min: usize,
) -> Result<Option<usize>, EmbedFnError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .filter(|&n| n >= min)
            .map(Some)
            .ok_or(EmbedFnError::InvalidField(field)),
        Some(_) => Err(EmbedFnError::InvalidField(field)),
    }
}

fn immutable(field: &'static str, value: &Option<Value>) -> Result<(), EmbedFnError> {
    match value {
        None => Ok(()),
        Some(_) => Err(EmbedFnError::ImmutableField(field)),
    }
}

/// Full validation, for construction and replacement.
///
/// Every field is checked before anything is reported; when several fields
/// fail, the error for the first one in the fixed order serviceUrl, model,
/// encodingFormat, chunkSize, chunkOverlap, chunkStrategy, splitter wins.
/// On success the typed snapshot is built from the checked values.
pub fn validate_config(raw: &RawEmbedConfig) -> Result<EmbedConfig, EmbedFnError> {
    let service_url = required_string(FIELD_SERVICE_URL, &raw.service_url);
    let model = required_string(FIELD_MODEL, &raw.model);
    let encoding_format = optional_string(FIELD_ENCODING_FORMAT, &raw.encoding_format);
    let chunk_size = optional_count(FIELD_CHUNK_SIZE, &raw.chunk_size, 1);
    let chunk_overlap = optional_count(FIELD_CHUNK_OVERLAP, &raw.chunk_overlap, 0);
    let chunk_strategy = optional_string(FIELD_CHUNK_STRATEGY, &raw.chunk_strategy);
    // splitter: the callable check holds for any present value by type.

    Ok(EmbedConfig {
        service_url: service_url?,
        model: model?,
        encoding_format: encoding_format?,
        chunk_size: chunk_size?,
        chunk_overlap: chunk_overlap?,
        chunk_strategy: chunk_strategy?,
    })
}

/// Update validation, for partial revisions of an existing configuration.
///
/// Only chunkSize and the splitter may change. Supplying any value for the
/// other fields, falsy values and explicit nulls included, is rejected.
/// Fields left out are silently ignored. Same check-all-report-first policy
/// and field order as [`validate_config`]. Pure: nothing is mutated here.
pub fn validate_config_update(update: &RawEmbedConfig) -> Result<(), EmbedFnError> {
    let service_url = immutable(FIELD_SERVICE_URL, &update.service_url);
    let model = immutable(FIELD_MODEL, &update.model);
    let encoding_format = immutable(FIELD_ENCODING_FORMAT, &update.encoding_format);
    let chunk_size = optional_count(FIELD_CHUNK_SIZE, &update.chunk_size, 1);
    let chunk_overlap = immutable(FIELD_CHUNK_OVERLAP, &update.chunk_overlap);
    let chunk_strategy = immutable(FIELD_CHUNK_STRATEGY, &update.chunk_strategy);

    service_url?;
    model?;
    encoding_format?;
    chunk_size?;
    chunk_overlap?;
    chunk_strategy?;
    Ok(())
}
