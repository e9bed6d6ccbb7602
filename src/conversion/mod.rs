//! Conversion engine
//!
//! Unit tables, the generic converter, and its tracing decorator.

pub mod converter;
pub mod operation;
pub mod traced;
pub mod units;

pub use converter::{
    ConversionError, ConversionResult, Converter, QuantityCalculator, UnitConversionTable,
};
pub use operation::{format_result, Operation};
pub use traced::Traced;
pub use units::{UnitCode, UnitTable, VolumeUnit, WeightUnit};

/// Converter over volume units (base unit: liter)
pub type VolumeConverter = Converter<VolumeUnit>;

/// Converter over weight units (base unit: gram)
pub type WeightConverter = Converter<WeightUnit>;
