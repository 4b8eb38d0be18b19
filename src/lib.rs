pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod providers;
pub mod proxy;
pub mod server;
pub mod translate;

pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use logging::{exchange_layer, open_exchange_log};
pub use providers::Provider;
pub use server::{build_router, AppState};
