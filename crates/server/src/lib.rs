pub mod api;
pub mod generate;
pub mod metrics;
pub mod state;
