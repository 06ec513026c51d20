pub mod api;
pub mod core;
pub mod error;
pub mod infra;
pub mod models;
pub mod service;

pub mod ax_state {
    use sqlx::{Database, Pool};

    pub struct AppState<DB: Database> {
        pub db: Pool<DB>,
    }
}
