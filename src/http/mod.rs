//! HTTP API module

pub mod server;

pub use server::{router, AppState, Domain};
