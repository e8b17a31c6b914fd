use std::env;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::http_client::http_client;
use crate::state::{Player, Sport};

/// Image column aliases seen in backend rows, in precedence order.
/// The first non-null value wins.
pub const IMAGE_URL_ALIASES: [&str; 7] = [
    "url",
    "image_url",
    "photo_url",
    "avatar_url",
    "image",
    "photo",
    "avatar",
];

/// Nested keys probed when an image column holds an object instead of a string.
pub const OBJECT_URL_KEYS: [&str; 3] = ["url", "fullUrl", "uri"];

const DEFAULT_TABLE: &str = "players";

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub base_url: String,
    pub anon_key: String,
    pub table: String,
}

impl SupabaseConfig {
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("SUPABASE_URL")
            .ok()
            .and_then(non_empty)
            .context("SUPABASE_URL is not set")?;
        let anon_key = env::var("SUPABASE_ANON_KEY")
            .ok()
            .or_else(|| env::var("SUPABASE_KEY").ok())
            .and_then(non_empty)
            .context("SUPABASE_ANON_KEY is not set")?;
        let table = env::var("PLAYERS_TABLE")
            .ok()
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            table,
        })
    }

    pub fn rows_url(&self) -> String {
        format!(
            "{}/rest/v1/{}?select=*&order=jersey_number.asc",
            self.base_url, self.table
        )
    }
}

// PostgREST error document. The useful text lives in `message`.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    message: Option<String>,
}

/// Fetch the full player table, ordered by jersey number ascending.
/// One round trip, no retries, no pagination.
pub fn fetch_players(config: &SupabaseConfig) -> Result<Vec<Player>> {
    let client = http_client()?;
    let resp = client
        .get(config.rows_url())
        .header("apikey", &config.anon_key)
        .bearer_auth(&config.anon_key)
        .send()
        .context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("{}", backend_error_message(status, &body)));
    }
    parse_players_json(&body)
}

fn backend_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(doc) = serde_json::from_str::<PostgrestError>(body)
        && let Some(message) = doc.message
        && !message.trim().is_empty()
    {
        return message;
    }
    format!("http {status}: {body}")
}

pub fn parse_players_json(raw: &str) -> Result<Vec<Player>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid players json")?;
    let Some(rows) = root.as_array() else {
        return Err(anyhow::anyhow!("players response is not an array"));
    };
    Ok(rows.iter().filter_map(parse_player).collect())
}

// Rows without an id cannot be selected or keyed, so they are dropped here
// rather than half-populated into the view layer.
fn parse_player(row: &Value) -> Option<Player> {
    let id = parse_id(row.get("id"))?;
    let full_name = pick_string(row, &["full_name"]).unwrap_or_default();
    let position = pick_string(row, &["position"]).unwrap_or_default();
    let jersey_number = pick_u32(row, &["jersey_number"]);
    let sport = pick_string(row, &["sport"]).and_then(|s| parse_sport(&s));
    let team = pick_string(row, &["team"]);
    let bio = pick_string(row, &["bio"]);
    let url = normalize_image_url(row);
    Some(Player {
        id,
        full_name,
        position,
        jersey_number,
        sport,
        team,
        bio,
        url,
    })
}

/// Resolve the canonical image url for a raw row: first non-null alias wins,
/// strings are trimmed and unwrapped from one layer of stray quotes, objects
/// are probed for a nested url and otherwise rendered as their JSON text so
/// the UI still has something to show.
pub fn normalize_image_url(row: &Value) -> Option<String> {
    for alias in IMAGE_URL_ALIASES {
        let Some(value) = row.get(alias) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        return Some(normalize_image_value(value));
    }
    None
}

fn normalize_image_value(value: &Value) -> String {
    match value {
        Value::String(s) => strip_wrapping_quotes(s.trim()).to_string(),
        Value::Object(map) => {
            for key in OBJECT_URL_KEYS {
                if let Some(Value::String(s)) = map.get(key) {
                    return s.to_string();
                }
            }
            value.to_string()
        }
        other => other.to_string(),
    }
}

fn strip_wrapping_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"' {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn parse_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_sport(raw: &str) -> Option<Sport> {
    match raw.trim().to_lowercase().as_str() {
        "football" => Some(Sport::Football),
        "basketball" => Some(Sport::Basketball),
        _ => None,
    }
}

fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(s) = as_string(v) {
                return Some(s);
            }
        }
    }
    None
}

fn pick_u32(value: &Value, keys: &[&str]) -> Option<u32> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = v.as_u64() {
                return Some(num as u32);
            }
            if let Some(s) = v.as_str() {
                if let Ok(num) = s.parse::<u32>() {
                    return Some(num);
                }
            }
        }
    }
    None
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
