//! Bot record model and the request/response shapes built around it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};

/// Name of the single generated script inside `files`.
pub const BOT_SCRIPT_FILE: &str = "bot.js";

/// Generated artifacts keyed by file name.
pub type BotFiles = BTreeMap<String, String>;

/// A bot as persisted in the `sites` table.
///
/// The table schema is owned by the store, so rows are read leniently:
/// `id` keeps whatever JSON the store assigned, `created_at` is kept as the
/// store rendered it, and unknown columns ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BotRecord {
    /// Row id assigned by the store, never written by this service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub id: Option<Value>,
    /// Display name derived from creation time (not unique)
    #[serde(default)]
    pub name: String,
    /// User-supplied personality text
    #[serde(default)]
    pub description: String,
    /// Generated scripts, currently always `bot.js`
    #[serde(default)]
    pub files: BotFiles,
    /// Public lookup key
    pub hash: String,
    /// Creation timestamp, ISO 8601
    #[serde(default)]
    pub created_at: String,
    /// Secret access key returned once at creation
    #[serde(default)]
    pub api_key: String,
    /// Columns this service does not write
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

impl BotRecord {
    /// The generated script, if present.
    pub fn script(&self) -> Option<&str> {
        self.files.get(BOT_SCRIPT_FILE).map(String::as_str)
    }
}

/// Response to a successful bot creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreatedBot {
    pub hash: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
}

/// A bot record with a generated reply merged into it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BotReply {
    #[serde(flatten)]
    pub bot: BotRecord,
    pub reply: String,
}

/// Parameters accepted by the bot endpoint, from the query string or JSON body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BotQuery {
    /// `listbots` or `getbot`
    pub action: Option<String>,
    /// Personality for a new bot (POST)
    pub description: Option<String>,
    /// Bot hash for `getbot`
    pub id: Option<String>,
    /// Message to answer with the configured reply strategy
    pub message: Option<String>,
}

impl BotQuery {
    /// Build from a JSON body. Truthy scalars count as present; numbers and
    /// `true` are rendered as text.
    pub fn from_json(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(truthy_text);
        Self {
            action: field("action"),
            description: field("description"),
            id: field("id"),
            message: field("message"),
        }
        .without_empty()
    }

    /// Build from decoded query pairs. A repeated key keeps its last value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (name, value) in pairs {
            let slot = match name.as_str() {
                "action" => &mut query.action,
                "description" => &mut query.description,
                "id" => &mut query.id,
                "message" => &mut query.message,
                _ => continue,
            };
            *slot = Some(value);
        }
        query.without_empty()
    }

    /// Fill every missing field from `fallback`. Fields already set win.
    pub fn or(self, fallback: BotQuery) -> Self {
        let this = self.without_empty();
        let fallback = fallback.without_empty();
        Self {
            action: this.action.or(fallback.action),
            description: this.description.or(fallback.description),
            id: this.id.or(fallback.id),
            message: this.message.or(fallback.message),
        }
    }

    fn without_empty(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            action: keep(self.action),
            description: keep(self.description),
            id: keep(self.id),
            message: keep(self.message),
        }
    }
}

/// Text of a truthy JSON scalar. `false`, `0`, `null`, arrays and objects
/// read as absent.
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                (i != 0).then(|| i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                let f = n.as_f64()?;
                if f == 0.0 || !f.is_finite() {
                    None
                } else if f.fract() == 0.0 && f.abs() < 1e15 {
                    Some(format!("{}", f as i64))
                } else {
                    Some(f.to_string())
                }
            }
        }
        _ => None,
    }
}
