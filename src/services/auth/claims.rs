use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Decoded token claims.
///
/// NOTE:
/// - `sub` is canonical. Older tokens carry the subject as `user_id`; both are
///   accepted on decode and `subject()` prefers `sub`. A numeric `user_id`
///   is read as its decimal string.
/// - `aud` is kept as a single string; array audiences fail to decode.
/// - Anything else in the payload lands in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,

    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Subject identifier, if present and non-empty.
    pub fn subject(&self) -> Option<&str> {
        non_empty(self.sub.as_deref()).or_else(|| non_empty(self.user_id.as_deref()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Id {
    Text(String),
    Number(Number),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    }))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Subject lookup on a raw claims mapping (before it is signed).
pub(crate) fn subject_of(claims: &Map<String, Value>) -> Option<String> {
    if let Some(sub) = non_empty(claims.get("sub").and_then(Value::as_str)) {
        return Some(sub.to_string());
    }
    match claims.get("user_id")? {
        Value::String(s) => non_empty(Some(s)).map(str::to_string),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
