//! Enum catalog
//!
//! Converter types, functions, and units exposed to clients with their stable
//! integer codes.

use serde::{Deserialize, Serialize};

use crate::conversion::{UnitTable, VolumeUnit, WeightUnit};

/// Quantity domain selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ConverterType {
    Volume = 0,
    Weight = 1,
}

impl ConverterType {
    pub const ALL: &'static [Self] = &[ConverterType::Volume, ConverterType::Weight];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConverterType::Volume => "Volume",
            ConverterType::Weight => "Weight",
        }
    }

    /// Path segment under `/api`
    pub fn route(&self) -> &'static str {
        match self {
            ConverterType::Volume => "volumes",
            ConverterType::Weight => "weights",
        }
    }
}

/// Operation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ConverterFunction {
    Convert = 0,
    Add = 1,
    Subtract = 2,
    Scale = 3,
    Difference = 4,
    Percentage = 5,
}

impl ConverterFunction {
    pub const ALL: &'static [Self] = &[
        ConverterFunction::Convert,
        ConverterFunction::Add,
        ConverterFunction::Subtract,
        ConverterFunction::Scale,
        ConverterFunction::Difference,
        ConverterFunction::Percentage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConverterFunction::Convert => "Convert",
            ConverterFunction::Add => "Add",
            ConverterFunction::Subtract => "Subtract",
            ConverterFunction::Scale => "Scale",
            ConverterFunction::Difference => "Difference",
            ConverterFunction::Percentage => "Percentage",
        }
    }

    /// Path segment under `/api/{volumes,weights}`
    pub fn route(&self) -> &'static str {
        match self {
            ConverterFunction::Convert => "convert",
            ConverterFunction::Add => "add",
            ConverterFunction::Subtract => "subtract",
            ConverterFunction::Scale => "scale",
            ConverterFunction::Difference => "difference",
            ConverterFunction::Percentage => "percentage",
        }
    }
}

/// A single `{name, value}` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumEntry {
    pub name: String,
    pub value: i32,
}

impl EnumEntry {
    fn new(name: &str, value: i32) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }

    fn from_unit<U: UnitTable>(unit: U) -> Self {
        Self::new(unit.name(), unit.code())
    }
}

/// Everything a client needs to build its selectors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumCatalog {
    pub converter_types: Vec<EnumEntry>,
    pub converter_functions: Vec<EnumEntry>,
    pub volume_units: Vec<EnumEntry>,
    pub weight_units: Vec<EnumEntry>,
}

impl EnumCatalog {
    /// Build the catalog, listing only the weight units `show_weight` accepts.
    ///
    /// Hidden units stay fully supported by the converters.
    pub fn build(show_weight: impl Fn(WeightUnit) -> bool) -> Self {
        Self {
            converter_types: ConverterType::ALL
                .iter()
                .map(|t| EnumEntry::new(t.as_str(), *t as i32))
                .collect(),
            converter_functions: ConverterFunction::ALL
                .iter()
                .map(|f| EnumEntry::new(f.as_str(), *f as i32))
                .collect(),
            volume_units: VolumeUnit::ALL.iter().copied().map(EnumEntry::from_unit).collect(),
            weight_units: WeightUnit::ALL
                .iter()
                .copied()
                .filter(|u| show_weight(*u))
                .map(EnumEntry::from_unit)
                .collect(),
        }
    }
}
