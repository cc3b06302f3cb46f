use crate::handlers::{account, market, order, ws};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/users/{user_id}", post(account::register_user))
        .route("/events/{event_id}", post(market::create_event))
        .route("/deposit", post(account::deposit))
        .route("/mint", post(order::mint_pair))
        .route("/orders/buy", post(order::place_buy))
        .route("/orders/sell", post(order::place_sell))
        .route("/orders/cancel", post(order::cancel_order))
        .route("/balance/{user_id}", get(account::get_balance))
        .route("/positions/{user_id}", get(account::get_positions))
        .route("/book/{event_id}", get(market::get_book))
        .route("/reset", post(market::reset))
        .route("/ws", get(ws::ws_handler));

    Router::new()
        .nest("/v1", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
