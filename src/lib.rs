pub mod aggregate;
pub mod assistant;
pub mod config;
pub mod dataset;
pub mod dispatcher;
pub mod error;
pub mod intent;
pub mod loader;
pub mod presenter;
pub mod risk;
pub mod schema;
pub mod server;
pub mod view;
