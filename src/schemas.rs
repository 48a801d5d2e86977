//! Wire types shared with the question-generation server.
//!
//! The server speaks Spanish field names; the Rust side uses English names and
//! maps them with serde renames. English aliases are accepted on input.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata keys emitted by the server.
pub const META_NICHE: &str = "nicho";
pub const META_AUDIENCE: &str = "audiencia";
pub const META_LOCATION: &str = "ubicacion";
pub const META_PLATFORM: &str = "plataforma";
pub const META_GENERATED_AT: &str = "fecha_generacion";

/// Form inputs for one generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(rename = "nicho", alias = "niche")]
    pub niche: String,
    #[serde(rename = "audiencia", alias = "audience")]
    pub audience: String,
    #[serde(rename = "ubicacion", alias = "location", default)]
    pub location: String,
    #[serde(rename = "plataforma", alias = "platform", default)]
    pub platform: String,
}

impl QueryParams {
    pub fn new(niche: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            niche: niche.into(),
            audience: audience.into(),
            ..Default::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Names of required fields that are blank.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.niche.trim().is_empty() {
            missing.push("niche");
        }
        if self.audience.trim().is_empty() {
            missing.push("audience");
        }
        missing
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionItem {
    #[serde(
        rename = "titulo",
        alias = "title",
        default,
        deserialize_with = "non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(rename = "pregunta", alias = "question")]
    pub question: String,
    #[serde(
        rename = "contexto",
        alias = "context",
        default,
        deserialize_with = "non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub context: Option<String>,
}

impl QuestionItem {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Empty and whitespace-only strings deserialize as absent.
fn non_empty<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// `null` deserializes the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ordered string→string map. Keeps the server's key order for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata(Vec<(String, String)>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value for `key`, or an empty string.
    pub fn value_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (k, v) in iter {
            metadata.insert(k, v);
        }
        metadata
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        // preserve_order keeps the server's insertion order here
        let raw = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(k, v)| {
                let v = match v {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (k, v)
            })
            .collect())
    }
}

/// Successful generation payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(
        rename = "preguntas",
        alias = "questions",
        default,
        deserialize_with = "null_as_default"
    )]
    pub questions: Vec<QuestionItem>,
    #[serde(
        rename = "metadatos",
        alias = "metadata",
        default,
        deserialize_with = "null_as_default"
    )]
    pub metadata: Metadata,
}

impl QueryResult {
    pub fn niche(&self) -> &str {
        self.metadata.value_or_empty(META_NICHE)
    }
}

/// Body of `GET /test`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub model_info: String,
}

/// Sentinel the server reports when no generation model could be initialised.
pub const NO_MODEL_AVAILABLE: &str = "No hay modelo disponible";

impl ServerStatus {
    pub fn model_available(&self) -> bool {
        !self.model_info.is_empty() && self.model_info != NO_MODEL_AVAILABLE
    }
}

/// Error body returned with a non-success status.
///
/// `code` (or `kind`) is the structured failure signal; older servers only
/// send `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, alias = "kind")]
    pub code: Option<String>,
}

/// Body of `POST /exportar`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
