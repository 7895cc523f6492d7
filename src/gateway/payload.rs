use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::scoring::ScoredDocument;

/// Body of `POST /v1/rerank`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RerankRequest {
    pub model: String,
    pub query: String,
    /// `null`, absent, zero or negative all mean "return everything".
    #[serde(default, deserialize_with = "deserialize_top_n")]
    pub top_n: Option<i64>,
    pub documents: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TopNInput {
    Int(i64),
    Huge(u64),
    Float(f64),
    Text(String),
}

/// Accepts integers of any size, whole-number floats and numeric strings.
///
/// Values beyond the `i64` range saturate; fractional values are rejected.
fn deserialize_top_n<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(input) = Option::<TopNInput>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let value = match input {
        TopNInput::Int(n) => n,
        TopNInput::Huge(_) => i64::MAX,
        TopNInput::Float(f) if f.is_finite() && f.fract() == 0.0 => f as i64,
        TopNInput::Float(f) => {
            return Err(D::Error::custom(format!(
                "top_n must be an integer, got {f}"
            )));
        }
        TopNInput::Text(text) => text.trim().parse::<i64>().map_err(|_| {
            D::Error::custom(format!("top_n must be an integer, got {text:?}"))
        })?,
    };

    Ok(Some(value))
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RerankResponse {
    pub results: Vec<ScoredDocument>,
}
