use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 12-byte record identifier: 4 bytes of big-endian unix seconds followed by
/// 8 random bytes. The all-zero value is the reserved nil sentinel meaning
/// "absent/unset"; backends assign real identifiers on first insert.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EntityId([u8; 12]);

#[derive(Debug, thiserror::Error)]
#[error("invalid record id '{0}': expected 24 hex digits")]
pub struct ParseIdError(String);

impl EntityId {
    pub const NIL: EntityId = EntityId([0; 12]);

    pub fn generate() -> Self {
        let mut bytes = [0u8; 12];
        let secs = chrono::Utc::now().timestamp() as u32;
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..].copy_from_slice(&rand::random::<[u8; 8]>());
        EntityId(bytes)
    }

    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }

    /// Strict codec: exactly 24 hex digits, or the empty string for the nil
    /// id (an absent reference serializes as ""). Anything else is an error;
    /// a malformed id must never be silently treated as absent.
    pub fn parse(s: &str) -> Result<Self, ParseIdError> {
        if s.is_empty() {
            return Ok(Self::NIL);
        }
        let raw = hex::decode(s).map_err(|_| ParseIdError(s.to_string()))?;
        let bytes: [u8; 12] = raw
            .try_into()
            .map_err(|_| ParseIdError(s.to_string()))?;
        Ok(EntityId(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.to_hex())
    }
}

impl FromStr for EntityId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        EntityId::parse(&s).map_err(serde::de::Error::custom)
    }
}
