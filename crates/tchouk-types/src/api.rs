use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::player::Player;

// -- JWT claims --

/// Claims carried in the `auth_token` cookie. `sub` is the username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

// -- Envelope --

/// `{code, message}` envelope used for failures and for simple successes
/// (login, delete). Resource responses are the resource's JSON shape
/// directly, without an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    pub code: u16,
    pub message: String,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Sent by older clients; token lifetime is fixed either way.
    #[serde(default)]
    pub keep_logged_in: bool,
}

// -- Matches --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMatchRequest {
    pub name: String,
    /// Player names seeded into each third's spreadsheet.
    #[serde(default)]
    pub players: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMatchRequest {
    #[serde(default)]
    pub name: Option<String>,
}

// -- Spreadsheets --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateSpreadsheetRequest {
    pub name: String,
    #[serde(default)]
    pub players: Vec<Player>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateSpreadsheetRequest {
    #[serde(default)]
    pub name: Option<String>,
    /// Replaces the whole player list when present.
    #[serde(default)]
    pub players: Option<Vec<Player>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddPlayerRequest {
    pub name: String,
}

// -- Graphs --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateGraphRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "graphType")]
    pub graph_type: Option<String>,
    /// Hex id of the data-source record; the empty string clears it.
    #[serde(default)]
    pub datasource: Option<String>,
    #[serde(default)]
    pub size: Option<crate::models::Size>,
    #[serde(default)]
    pub position: Option<crate::models::Position>,
}

// -- Webpages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateWebpageRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub size: Option<crate::models::Size>,
    #[serde(default)]
    pub position: Option<crate::models::Position>,
}
