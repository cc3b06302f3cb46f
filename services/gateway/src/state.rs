use crate::exchange::ExchangeHandle;

#[derive(Clone)]
pub struct AppState {
    pub exchange: ExchangeHandle,
}

impl AppState {
    pub fn new(exchange: ExchangeHandle) -> Self {
        Self { exchange }
    }
}
