//! Command, reply, and broadcast envelopes
//!
//! The closed command vocabulary for the exchange, decoded exactly once at
//! the queue boundary. Wire shape of a command is
//! `{"type": ..., "data": {...}, "requestId": ...}`; replies echo the
//! correlation id as `{"requestId": ..., "error": bool, "msg": ...}` where
//! `msg` carries a JSON-encoded payload or an error string.

use serde::{Deserialize, Serialize};

use types::errors::ExchangeError;
use types::ids::{EventId, UserId};
use types::side::Side;

use crate::snapshot::BookSnapshot;

/// Every operation the exchange accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Command {
    #[serde(rename_all = "camelCase")]
    CreateEvent { event_id: EventId },
    #[serde(rename_all = "camelCase")]
    RegisterUser { user_id: UserId },
    #[serde(rename_all = "camelCase")]
    Deposit { user_id: UserId, amount: u64 },
    #[serde(rename_all = "camelCase")]
    MintPair {
        user_id: UserId,
        event_id: EventId,
        quantity: u64,
    },
    #[serde(rename_all = "camelCase")]
    PlaceBuy {
        user_id: UserId,
        event_id: EventId,
        side: Side,
        price: u8,
        quantity: u64,
    },
    #[serde(rename_all = "camelCase")]
    PlaceSell {
        user_id: UserId,
        event_id: EventId,
        side: Side,
        price: u8,
        quantity: u64,
    },
    #[serde(rename_all = "camelCase")]
    Cancel {
        user_id: UserId,
        event_id: EventId,
        side: Side,
        price: u8,
        quantity: u64,
    },
    #[serde(rename_all = "camelCase")]
    GetBalance { user_id: UserId },
    #[serde(rename_all = "camelCase")]
    GetPositions { user_id: UserId },
    #[serde(rename_all = "camelCase")]
    GetBook { event_id: EventId },
    ResetAll {},
}

impl Command {
    /// Command name for logging
    pub fn label(&self) -> &'static str {
        match self {
            Command::CreateEvent { .. } => "createEvent",
            Command::RegisterUser { .. } => "registerUser",
            Command::Deposit { .. } => "deposit",
            Command::MintPair { .. } => "mintPair",
            Command::PlaceBuy { .. } => "placeBuy",
            Command::PlaceSell { .. } => "placeSell",
            Command::Cancel { .. } => "cancel",
            Command::GetBalance { .. } => "getBalance",
            Command::GetPositions { .. } => "getPositions",
            Command::GetBook { .. } => "getBook",
            Command::ResetAll {} => "resetAll",
        }
    }
}

/// A command paired with its correlation id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    #[serde(rename = "requestId")]
    pub request_id: String,
    #[serde(flatten)]
    pub command: Command,
}

impl CommandEnvelope {
    pub fn new(request_id: impl Into<String>, command: Command) -> Self {
        Self {
            request_id: request_id.into(),
            command,
        }
    }

    /// Decode a serialized envelope.
    ///
    /// A recognizable envelope with an unknown or malformed command decodes
    /// to an error that still carries the correlation id, so the sender gets
    /// a correlated `UnknownCommand` reply instead of silence.
    pub fn decode(raw: &str) -> Result<Self, (String, ExchangeError)> {
        let value: serde_json::Value = serde_json::from_str(raw).map_err(|_| {
            (
                String::new(),
                ExchangeError::UnknownCommand("malformed envelope".to_string()),
            )
        })?;
        let request_id = value
            .get("requestId")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        serde_json::from_value(value.clone()).map_err(|_| {
            let kind = value
                .get("type")
                .and_then(|v| v.as_str())
                .unwrap_or("<missing type>")
                .to_string();
            (request_id, ExchangeError::UnknownCommand(kind))
        })
    }
}

/// Correlated reply for a single command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyEnvelope {
    pub request_id: String,
    pub error: bool,
    pub msg: String,
}

impl ReplyEnvelope {
    pub fn ok(request_id: &str, payload: serde_json::Value) -> Self {
        Self {
            request_id: request_id.to_string(),
            error: false,
            msg: payload.to_string(),
        }
    }

    pub fn err(request_id: &str, error: &ExchangeError) -> Self {
        Self {
            request_id: request_id.to_string(),
            error: true,
            msg: error.to_string(),
        }
    }
}

/// Book update fanned out to subscribers of one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookBroadcast {
    pub event_id: EventId,
    pub book: BookSnapshot,
}
