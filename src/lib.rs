pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod migrate;
pub mod observability;
pub mod routes;

pub use config::Config;
pub use routes::{AppState, router};

/// Wires the shopping command and query sides onto one pool, for tests
/// that drive the router without a listener.
pub fn app_state(config: &Config, pool: sqlx::SqlitePool) -> AppState {
    let settings = config.shopping.settings();

    AppState {
        command: hearth_shopping::Command::new(hearth_shared::State::new(pool.clone()), settings),
        query: hearth_shopping::Query(pool.clone()),
        pool,
    }
}
