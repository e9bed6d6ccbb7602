//! Data models
//!
//! Wire enums exposed to clients and database entities.

mod catalog;
mod conversion_log;

pub use catalog::{ConverterFunction, ConverterType, EnumCatalog, EnumEntry};
pub use conversion_log::ConversionLog;
