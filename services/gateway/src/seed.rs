//! Optional demo data, enqueued through the normal command path
//!
//! Gives a fresh instance a couple of funded users and a market with
//! liquidity on both sides, for local development against a browser client.

use engine::commands::Command;
use types::ids::{EventId, UserId};
use types::side::Side;

use crate::error::AppError;
use crate::exchange::ExchangeHandle;

pub async fn seed_demo(exchange: &ExchangeHandle) -> Result<(), AppError> {
    let event = EventId::new("BTC_above_100k_by_Oct_2026");

    let deposits = [("user1", 100_000), ("user2", 200_000), ("user3", 150_000)];
    for (user, amount) in deposits {
        exchange
            .submit(Command::RegisterUser {
                user_id: UserId::new(user),
            })
            .await?;
        exchange
            .submit(Command::Deposit {
                user_id: UserId::new(user),
                amount,
            })
            .await?;
    }

    exchange
        .submit(Command::CreateEvent {
            event_id: event.clone(),
        })
        .await?;

    // user1 bids NO with no liquidity around: mints, leaving a YES offer
    exchange
        .submit(Command::PlaceBuy {
            user_id: UserId::new("user1"),
            event_id: event.clone(),
            side: Side::No,
            price: 2,
            quantity: 100,
        })
        .await?;

    // user2 mints outright and offers the NO side
    exchange
        .submit(Command::MintPair {
            user_id: UserId::new("user2"),
            event_id: event.clone(),
            quantity: 50,
        })
        .await?;
    exchange
        .submit(Command::PlaceSell {
            user_id: UserId::new("user2"),
            event_id: event,
            side: Side::No,
            price: 2,
            quantity: 50,
        })
        .await?;

    tracing::info!("demo data seeded");
    Ok(())
}
