//! Service tools
//!
//! Request-level operations behind the HTTP endpoints.

pub mod conversions;
pub mod enums;
pub mod history;
pub mod status;
