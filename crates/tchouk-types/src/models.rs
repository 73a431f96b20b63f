use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, Widget};
use crate::id::{EntityId, ParseIdError};
use crate::player::Player;

// -- Matches --

/// A tracked match. `thirds` maps the period key ("first"/"second"/"third")
/// to the spreadsheet recording that period.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Match {
    #[serde(default, skip_serializing_if = "EntityId::is_nil")]
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub thirds: HashMap<String, EntityId>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Entity for Match {
    const KIND: &'static str = "Matches";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

// -- Spreadsheets --

/// A score sheet: an aggregate owning its players. Persisted and rewritten
/// as one unit; there is no field-level update of a single player.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Spreadsheet {
    #[serde(default, skip_serializing_if = "EntityId::is_nil")]
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub players: Vec<Player>,
}

impl Spreadsheet {
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn player_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    /// First name that appears more than once, if any. Lookup is by name,
    /// so a sheet must never hold two players with the same one.
    pub fn duplicate_player(&self) -> Option<&str> {
        duplicate_player_name(&self.players)
    }
}

pub fn duplicate_player_name(players: &[Player]) -> Option<&str> {
    for (i, player) in players.iter().enumerate() {
        if players[..i].iter().any(|p| p.name == player.name) {
            return Some(&player.name);
        }
    }
    None
}

impl Entity for Spreadsheet {
    const KIND: &'static str = "Spreadsheets";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

// -- Dashboard widget geometry --

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

// -- Graphs --

/// Client-facing graph shape: identifiers as hex strings, a nil data source
/// rendered as the empty string.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Graph {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(rename = "graphType")]
    pub graph_type: String,
    #[serde(default)]
    pub datasource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Storage shape of a graph.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GraphRecord {
    #[serde(default, skip_serializing_if = "EntityId::is_nil")]
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub graph_type: String,
    #[serde(default, skip_serializing_if = "EntityId::is_nil")]
    pub datasource: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Graph {
    pub fn to_record(&self) -> Result<GraphRecord, ParseIdError> {
        Ok(GraphRecord {
            id: EntityId::parse(&self.id)?,
            name: self.name.clone(),
            graph_type: self.graph_type.clone(),
            datasource: EntityId::parse(&self.datasource)?,
            size: self.size,
            position: self.position,
        })
    }
}

impl GraphRecord {
    pub fn to_domain(&self) -> Graph {
        Graph {
            id: self.id.to_hex(),
            name: self.name.clone(),
            graph_type: self.graph_type.clone(),
            datasource: if self.datasource.is_nil() {
                String::new()
            } else {
                self.datasource.to_hex()
            },
            size: self.size,
            position: self.position,
        }
    }
}

impl Entity for GraphRecord {
    const KIND: &'static str = "Graphs";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl Widget for GraphRecord {
    fn set_size(&mut self, size: Option<Size>) {
        self.size = size;
    }

    fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }
}

// -- Users --

/// Client-facing user shape. Deliberately has no password field: the hash
/// lives only on `UserRecord` and cannot reach a serialized payload.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct User {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub username: String,
}

/// Storage shape of a user; `password` is the argon2 hash.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "EntityId::is_nil")]
    pub id: EntityId,
    pub username: String,
    pub password: String,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        UserRecord {
            id: EntityId::NIL,
            username: username.into(),
            password: password_hash.into(),
        }
    }

    pub fn to_domain(&self) -> User {
        User {
            id: self.id.to_hex(),
            username: self.username.clone(),
        }
    }
}

impl Entity for UserRecord {
    const KIND: &'static str = "Users";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.username
    }

    fn set_name(&mut self, name: String) {
        self.username = name;
    }
}

// -- Webpages --

/// Client-facing embedded-webpage tile.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Webpage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Storage shape of a webpage tile.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WebpageRecord {
    #[serde(default, skip_serializing_if = "EntityId::is_nil")]
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Webpage {
    pub fn to_record(&self) -> Result<WebpageRecord, ParseIdError> {
        Ok(WebpageRecord {
            id: EntityId::parse(&self.id)?,
            name: self.name.clone(),
            description: self.description.clone(),
            src: self.src.clone(),
            size: self.size,
            position: self.position,
        })
    }
}

impl WebpageRecord {
    pub fn to_domain(&self) -> Webpage {
        Webpage {
            id: self.id.to_hex(),
            name: self.name.clone(),
            description: self.description.clone(),
            src: self.src.clone(),
            size: self.size,
            position: self.position,
        }
    }
}

impl Entity for WebpageRecord {
    const KIND: &'static str = "Webpages";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl Widget for WebpageRecord {
    fn set_size(&mut self, size: Option<Size>) {
        self.size = size;
    }

    fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }
}
