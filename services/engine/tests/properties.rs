//! Randomized command sequences against the processor
//!
//! Drives the full dispatch path with arbitrary (including invalid)
//! commands and checks the structural invariants after every step:
//!
//! - conservation: per event, positions plus resting minted legs balance
//!   across the two sides; trading never creates or destroys net position
//! - every locked position is covered by a resting sell and vice versa
//! - every subunit of locked cash is backing for a resting minted leg
//! - cash in the system never exceeds what was deposited
//! - no observable price level is empty or inconsistent
//! - a rejected command leaves the state bit-identical

use chrono::Utc;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use engine::book::OrderKind;
use engine::commands::Command;
use engine::processor::CommandProcessor;
use engine::snapshot::BookSnapshot;
use types::ids::{EventId, UserId};
use types::numeric::{MAX_TICK, TICK_UNIT};
use types::side::Side;

const USERS: [&str; 3] = ["u0", "u1", "u2"];
const EVENTS: [&str; 2] = ["e0", "e1"];

fn arb_user() -> impl Strategy<Value = UserId> {
    (0..USERS.len()).prop_map(|i| UserId::new(USERS[i]))
}

fn arb_event() -> impl Strategy<Value = EventId> {
    (0..EVENTS.len()).prop_map(|i| EventId::new(EVENTS[i]))
}

fn arb_side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Yes), Just(Side::No)]
}

// prices 0..=MAX_TICK and zero quantities are generated on purpose: the
// rejection paths must hold the invariants too
fn arb_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        1 => arb_user().prop_map(|user_id| Command::RegisterUser { user_id }),
        3 => (arb_user(), 0u64..50_000).prop_map(|(user_id, amount)| Command::Deposit {
            user_id,
            amount
        }),
        2 => (arb_user(), arb_event(), 0u64..15).prop_map(|(user_id, event_id, quantity)| {
            Command::MintPair {
                user_id,
                event_id,
                quantity,
            }
        }),
        4 => (arb_user(), arb_event(), arb_side(), 0u8..=MAX_TICK, 0u64..15).prop_map(
            |(user_id, event_id, side, price, quantity)| Command::PlaceBuy {
                user_id,
                event_id,
                side,
                price,
                quantity,
            }
        ),
        3 => (arb_user(), arb_event(), arb_side(), 0u8..=MAX_TICK, 0u64..15).prop_map(
            |(user_id, event_id, side, price, quantity)| Command::PlaceSell {
                user_id,
                event_id,
                side,
                price,
                quantity,
            }
        ),
        2 => (arb_user(), arb_event(), arb_side(), 0u8..=MAX_TICK, 0u64..15).prop_map(
            |(user_id, event_id, side, price, quantity)| Command::Cancel {
                user_id,
                event_id,
                side,
                price,
                quantity,
            }
        ),
        1 => arb_user().prop_map(|user_id| Command::GetPositions { user_id }),
        1 => arb_event().prop_map(|event_id| Command::GetBook { event_id }),
    ]
}

/// Serialized view of all observable state, for no-mutation checks
fn fingerprint(processor: &CommandProcessor) -> String {
    let ledger = processor.ledger();
    let mut state = serde_json::Map::new();
    for id in USERS {
        let user = UserId::new(id);
        state.insert(
            format!("account:{id}"),
            serde_json::to_value(ledger.account(&user)).unwrap(),
        );
        state.insert(
            format!("holdings:{id}"),
            serde_json::to_value(ledger.holdings(&user)).unwrap(),
        );
    }
    for id in EVENTS {
        let event = EventId::new(id);
        if let Some(book) = processor.book(&event) {
            state.insert(
                format!("book:{id}"),
                serde_json::to_value(BookSnapshot::capture(&event, book)).unwrap(),
            );
        }
    }
    serde_json::to_string(&state).unwrap()
}

fn check_invariants(processor: &CommandProcessor) -> Result<(), TestCaseError> {
    let ledger = processor.ledger();
    let mut minted_backing: u64 = 0;

    for id in EVENTS {
        let event = EventId::new(id);
        let book = processor.book(&event);

        let position_total = |side: Side| -> u64 {
            USERS
                .iter()
                .map(|u| {
                    let p = ledger.position(&UserId::new(*u), &event, side);
                    p.available.value() + p.locked.value()
                })
                .sum()
        };
        let yes_positions = position_total(Side::Yes);
        let no_positions = position_total(Side::No);

        let resting = |side: Side, kind: OrderKind| -> u64 {
            book.map(|b| b.side(side).total_of_kind(kind).value())
                .unwrap_or(0)
        };
        let yes_minted = resting(Side::Yes, OrderKind::Minted);
        let no_minted = resting(Side::No, OrderKind::Minted);

        // conservation: a resting minted leg is the not-yet-delivered half
        // of a pair whose other half is already held as position
        prop_assert_eq!(
            yes_positions + yes_minted,
            no_positions + no_minted,
            "conservation broken for {}",
            id
        );

        for side in [Side::Yes, Side::No] {
            let locked: u64 = USERS
                .iter()
                .map(|u| ledger.position(&UserId::new(*u), &event, side).locked.value())
                .sum();
            prop_assert_eq!(
                locked,
                resting(side, OrderKind::Sell),
                "locked positions must equal resting sells on {} {}",
                id,
                side
            );
        }

        if let Some(book) = book {
            for side in [Side::Yes, Side::No] {
                for (tick, level) in book.side(side).levels() {
                    // no empty or inconsistent levels
                    prop_assert!(!level.is_empty());
                    prop_assert!(!level.total_quantity().is_zero());
                    let sum: u64 = level.orders().map(|o| o.quantity.value()).sum();
                    prop_assert_eq!(level.total_quantity().value(), sum);
                    for order in level.orders() {
                        prop_assert!(!order.quantity.is_zero());
                        if order.kind == OrderKind::Minted {
                            minted_backing += order.quantity.value()
                                * u64::from(MAX_TICK - tick.value())
                                * TICK_UNIT;
                        }
                    }
                }
            }
        }
    }

    // every locked subunit backs a resting minted leg, nothing more
    let locked_cash: u64 = USERS
        .iter()
        .filter_map(|u| ledger.account(&UserId::new(*u)))
        .map(|a| a.locked_cash.value())
        .sum();
    prop_assert_eq!(locked_cash, minted_backing, "locked cash must equal minted backing");

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_invariants_hold_over_random_sequences(
        commands in proptest::collection::vec(arb_command(), 1..100)
    ) {
        let mut processor = CommandProcessor::new();
        let mut deposited: u64 = 0;

        for command in commands {
            let before = fingerprint(&processor);
            let outcome = processor.handle("prop", command.clone(), Utc::now());

            if outcome.reply.error {
                // rejected commands mutate nothing
                prop_assert_eq!(&before, &fingerprint(&processor));
            } else if let Command::Deposit { amount, .. } = &command {
                deposited += amount;
            }

            check_invariants(&processor)?;

            // cash is conserved: what users hold never exceeds deposits
            let held: u64 = USERS
                .iter()
                .filter_map(|u| processor.ledger().account(&UserId::new(*u)))
                .map(|a| a.cash.value() + a.locked_cash.value())
                .sum();
            prop_assert!(held <= deposited, "held {} exceeds deposited {}", held, deposited);
        }
    }

    #[test]
    fn prop_reset_always_returns_to_empty(
        commands in proptest::collection::vec(arb_command(), 1..40)
    ) {
        let mut processor = CommandProcessor::new();
        for command in commands {
            processor.handle("prop", command, Utc::now());
        }
        processor.handle("prop", Command::ResetAll {}, Utc::now());

        prop_assert_eq!(processor.ledger().account_count(), 0);
        for id in EVENTS {
            prop_assert!(processor.book(&EventId::new(id)).is_none());
        }
    }
}
