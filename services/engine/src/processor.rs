//! Sequential command processor
//!
//! The sole mutator of ledger and book state. One instance is constructed
//! at process start and moved into a single consumer loop; commands are
//! handled strictly one at a time in dequeue order, which is what makes
//! every matching invariant hold without locks.
//!
//! Each command produces a correlated reply and, when the event's book
//! changed, a broadcast for subscribers. Failed commands mutate nothing and
//! produce no broadcast.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use types::errors::ExchangeError;
use types::ids::{EventId, UserId};
use types::numeric::{Quantity, Tick};

use crate::book::OrderBook;
use crate::commands::{BookBroadcast, Command, CommandEnvelope, ReplyEnvelope};
use crate::ledger::Ledger;
use crate::matching;
use crate::snapshot::BookSnapshot;

/// Everything one command produces
#[derive(Debug, Clone)]
pub struct Outcome {
    pub reply: ReplyEnvelope,
    pub broadcast: Option<BookBroadcast>,
    /// Typed error kind for in-process consumers; the reply's `msg` carries
    /// only the rendered string
    pub error: Option<ExchangeError>,
}

/// The exchange state machine
#[derive(Debug, Default)]
pub struct CommandProcessor {
    ledger: Ledger,
    books: BTreeMap<EventId, OrderBook>,
}

impl CommandProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a serialized command envelope (the queue wire format)
    pub fn handle_json(&mut self, raw: &str, now: DateTime<Utc>) -> Outcome {
        match CommandEnvelope::decode(raw) {
            Ok(CommandEnvelope {
                request_id,
                command,
            }) => self.handle(&request_id, command, now),
            Err((request_id, err)) => {
                tracing::debug!(%err, "rejected undecodable command");
                Outcome {
                    reply: ReplyEnvelope::err(&request_id, &err),
                    broadcast: None,
                    error: Some(err),
                }
            }
        }
    }

    /// Handle one decoded command
    pub fn handle(&mut self, request_id: &str, command: Command, now: DateTime<Utc>) -> Outcome {
        let label = command.label();
        match self.dispatch(command, now) {
            Ok((payload, changed)) => {
                tracing::debug!(command = label, "command applied");
                let broadcast = changed.map(|event_id| {
                    let book = self.books.get(&event_id);
                    let snapshot = book
                        .map(|b| BookSnapshot::capture(&event_id, b))
                        .unwrap_or_else(|| BookSnapshot::empty(&event_id));
                    BookBroadcast {
                        event_id,
                        book: snapshot,
                    }
                });
                Outcome {
                    reply: ReplyEnvelope::ok(request_id, payload),
                    broadcast,
                    error: None,
                }
            }
            Err(err) => {
                if err.is_internal() {
                    tracing::error!(command = label, %err, "invariant violation");
                } else {
                    tracing::debug!(command = label, %err, "command rejected");
                }
                Outcome {
                    reply: ReplyEnvelope::err(request_id, &err),
                    broadcast: None,
                    error: Some(err),
                }
            }
        }
    }

    fn dispatch(
        &mut self,
        command: Command,
        now: DateTime<Utc>,
    ) -> Result<(serde_json::Value, Option<EventId>), ExchangeError> {
        match command {
            Command::CreateEvent { event_id } => {
                self.books.entry(event_id.clone()).or_default();
                Ok((encode(&event_id)?, None))
            }

            Command::RegisterUser { user_id } => {
                self.ledger.register(user_id.clone());
                Ok((encode(&user_id)?, None))
            }

            Command::Deposit { user_id, amount } => {
                let amount = parse_amount(amount)?;
                self.ledger.credit(&user_id, amount)?;
                let account = self.balance_view(&user_id)?;
                Ok((account, None))
            }

            Command::MintPair {
                user_id,
                event_id,
                quantity,
            } => {
                let quantity = parse_quantity(quantity)?;
                // an explicit mint is a mutating first reference to the event
                let ledger = &mut self.ledger;
                with_book(&mut self.books, &event_id, |_| {
                    matching::mint_pair(ledger, &user_id, &event_id, quantity)
                })?;
                let payload = json!({
                    "yes": self.ledger.position(&user_id, &event_id, types::side::Side::Yes),
                    "no": self.ledger.position(&user_id, &event_id, types::side::Side::No),
                });
                Ok((payload, None))
            }

            Command::PlaceBuy {
                user_id,
                event_id,
                side,
                price,
                quantity,
            } => {
                let price = parse_tick(price)?;
                let quantity = parse_quantity(quantity)?;
                let ledger = &mut self.ledger;
                let outcome = with_book(&mut self.books, &event_id, |book| {
                    matching::place_buy(ledger, book, &user_id, &event_id, side, price, quantity, now)
                })?;
                let payload = json!({
                    "trades": outcome.trades,
                    "minted": outcome.minted.map(|(price, quantity)| json!({
                        "price": price,
                        "quantity": quantity,
                    })),
                });
                Ok((payload, Some(event_id)))
            }

            Command::PlaceSell {
                user_id,
                event_id,
                side,
                price,
                quantity,
            } => {
                let price = parse_tick(price)?;
                let quantity = parse_quantity(quantity)?;
                let ledger = &mut self.ledger;
                with_book(&mut self.books, &event_id, |book| {
                    matching::place_sell(ledger, book, &user_id, &event_id, side, price, quantity)
                })?;
                let payload = json!({
                    "position": self.ledger.position(&user_id, &event_id, side),
                });
                Ok((payload, Some(event_id)))
            }

            Command::Cancel {
                user_id,
                event_id,
                side,
                price,
                quantity,
            } => {
                let price = parse_tick(price)?;
                let quantity = parse_quantity(quantity)?;
                let book = self
                    .books
                    .get_mut(&event_id)
                    .ok_or_else(|| ExchangeError::EventNotFound(event_id.clone()))?;
                let cancelled =
                    matching::cancel(&mut self.ledger, book, &user_id, &event_id, side, price, quantity)?;
                Ok((json!({ "cancelled": cancelled }), Some(event_id)))
            }

            Command::GetBalance { user_id } => Ok((self.balance_view(&user_id)?, None)),

            Command::GetPositions { user_id } => {
                let holdings = self
                    .ledger
                    .holdings(&user_id)
                    .ok_or_else(|| ExchangeError::UserNotFound(user_id.clone()))?;
                Ok((encode(&holdings)?, None))
            }

            Command::GetBook { event_id } => {
                // a read never creates the book
                let snapshot = self
                    .books
                    .get(&event_id)
                    .map(|book| BookSnapshot::capture(&event_id, book))
                    .unwrap_or_else(|| BookSnapshot::empty(&event_id));
                Ok((encode(&snapshot)?, None))
            }

            Command::ResetAll {} => {
                self.ledger.reset();
                self.books.clear();
                Ok((json!("reset complete"), None))
            }
        }
    }

    fn balance_view(&self, user: &UserId) -> Result<serde_json::Value, ExchangeError> {
        let account = self
            .ledger
            .account(user)
            .ok_or_else(|| ExchangeError::UserNotFound(user.clone()))?;
        encode(&account)
    }

    /// Read access for integration tests and diagnostics
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn book(&self, event: &EventId) -> Option<&OrderBook> {
        self.books.get(event)
    }
}

/// Run a mutating closure against an event's book, creating the book on
/// first reference and rolling the creation back if the command fails.
fn with_book<R>(
    books: &mut BTreeMap<EventId, OrderBook>,
    event: &EventId,
    f: impl FnOnce(&mut OrderBook) -> Result<R, ExchangeError>,
) -> Result<R, ExchangeError> {
    let created = !books.contains_key(event);
    let book = books.entry(event.clone()).or_default();
    let result = f(book);
    if result.is_err() && created {
        books.remove(event);
    }
    result
}

fn parse_tick(raw: u8) -> Result<Tick, ExchangeError> {
    Tick::try_new(raw).ok_or(ExchangeError::InvalidPrice(raw))
}

fn parse_quantity(raw: u64) -> Result<Quantity, ExchangeError> {
    if raw == 0 {
        return Err(ExchangeError::InvalidQuantity(raw));
    }
    Ok(Quantity::new(raw))
}

fn parse_amount(raw: u64) -> Result<types::numeric::Cash, ExchangeError> {
    if raw == 0 {
        return Err(ExchangeError::InvalidQuantity(raw));
    }
    Ok(types::numeric::Cash::new(raw))
}

fn encode<T: Serialize>(value: &T) -> Result<serde_json::Value, ExchangeError> {
    serde_json::to_value(value)
        .map_err(|e| ExchangeError::InvariantViolation(format!("reply encoding failed: {e}")))
}
