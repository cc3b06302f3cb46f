//! Unique identifier types for exchange entities
//!
//! User and event identifiers are caller-supplied opaque strings; trade
//! identifiers use UUID v7 for time-sortable ordering, enabling efficient
//! chronological queries over the trade log.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a user account
///
/// Supplied by the client at registration time and used verbatim as the
/// ledger key. No format is enforced beyond being non-empty at the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Unique identifier for a tradable event (a binary-outcome market)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Create a new EventId from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Unique identifier for a trade
///
/// Uses UUID v7 for time-based sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(Uuid);

impl TradeId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TradeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_roundtrip() {
        let id = UserId::new("user1");
        assert_eq!(id.as_str(), "user1");

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"user1\"");

        let deserialized: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_event_id_ordering() {
        let a = EventId::new("BTC_above_100k");
        let b = EventId::new("ETH_above_10k");
        assert!(a < b, "EventIds order lexicographically");
    }

    #[test]
    fn test_trade_id_uniqueness() {
        let id1 = TradeId::new();
        let id2 = TradeId::new();
        assert_ne!(id1, id2, "TradeIds should be unique");
    }

    #[test]
    fn test_trade_id_serialization() {
        let id = TradeId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: TradeId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
