//! Unit types and conversion constants
//!
//! Every supported unit carries a stable wire code and a scale factor relative
//! to its domain's base unit (liter for volume, gram for weight).

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// A closed set of units belonging to one quantity domain
pub trait UnitTable: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Lowercase domain name, used in error messages
    const DOMAIN: &'static str;

    /// Every unit, in declaration (wire code) order
    const ALL: &'static [Self];

    /// Stable integer code exchanged with clients
    fn code(self) -> i32;

    /// Display name, identical to the enum variant name
    fn name(self) -> &'static str;

    /// How many base units equal one of this unit
    fn factor(self) -> f64;

    /// Look up a unit by wire code
    fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|u| u.code() == code)
    }

    /// Look up a unit by name (case-insensitive)
    fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|u| u.name().eq_ignore_ascii_case(trimmed))
    }
}

// ============================================================================
// Volume Conversion Constants (to liters)
// ============================================================================

/// Liters per milliliter
pub const L_PER_ML: f64 = 0.001;
/// Liters per centiliter
pub const L_PER_CL: f64 = 0.01;
/// Liters per deciliter
pub const L_PER_DL: f64 = 0.1;
/// Liters per cubic meter
pub const L_PER_M3: f64 = 1000.0;
/// Liters per cup (metric cup as served to clients)
pub const L_PER_CUP: f64 = 0.24;
/// Liters per quart (US)
pub const L_PER_QUART: f64 = 0.946353;
/// Liters per gallon (US)
pub const L_PER_GALLON: f64 = 3.78541;

// ============================================================================
// Weight Conversion Constants (to grams)
// ============================================================================

/// Grams per microgram
pub const G_PER_UG: f64 = 0.000001;
/// Grams per milligram
pub const G_PER_MG: f64 = 0.001;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per ounce
pub const G_PER_OZ: f64 = 28.3495;
/// Grams per pound
pub const G_PER_LB: f64 = 453.592;
/// Grams per stone
pub const G_PER_ST: f64 = 6350.29;

/// Volume units. Discriminants are wire codes and must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum VolumeUnit {
    Milliliter = 0,
    Centiliter = 1,
    Deciliter = 2,
    Liter = 3,
    CubicMeter = 4,
    Cup = 5,
    Quart = 6,
    Gallon = 7,
}

impl UnitTable for VolumeUnit {
    const DOMAIN: &'static str = "volume";

    const ALL: &'static [Self] = &[
        VolumeUnit::Milliliter,
        VolumeUnit::Centiliter,
        VolumeUnit::Deciliter,
        VolumeUnit::Liter,
        VolumeUnit::CubicMeter,
        VolumeUnit::Cup,
        VolumeUnit::Quart,
        VolumeUnit::Gallon,
    ];

    fn code(self) -> i32 {
        self as i32
    }

    fn name(self) -> &'static str {
        match self {
            VolumeUnit::Milliliter => "Milliliter",
            VolumeUnit::Centiliter => "Centiliter",
            VolumeUnit::Deciliter => "Deciliter",
            VolumeUnit::Liter => "Liter",
            VolumeUnit::CubicMeter => "CubicMeter",
            VolumeUnit::Cup => "Cup",
            VolumeUnit::Quart => "Quart",
            VolumeUnit::Gallon => "Gallon",
        }
    }

    fn factor(self) -> f64 {
        match self {
            VolumeUnit::Milliliter => L_PER_ML,
            VolumeUnit::Centiliter => L_PER_CL,
            VolumeUnit::Deciliter => L_PER_DL,
            VolumeUnit::Liter => 1.0,
            VolumeUnit::CubicMeter => L_PER_M3,
            VolumeUnit::Cup => L_PER_CUP,
            VolumeUnit::Quart => L_PER_QUART,
            VolumeUnit::Gallon => L_PER_GALLON,
        }
    }
}

/// Weight units. Discriminants are wire codes and must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum WeightUnit {
    Microgram = 0,
    Milligram = 1,
    Gram = 2,
    Kilogram = 3,
    Ounce = 4,
    Pound = 5,
    Stone = 6,
}

impl UnitTable for WeightUnit {
    const DOMAIN: &'static str = "weight";

    const ALL: &'static [Self] = &[
        WeightUnit::Microgram,
        WeightUnit::Milligram,
        WeightUnit::Gram,
        WeightUnit::Kilogram,
        WeightUnit::Ounce,
        WeightUnit::Pound,
        WeightUnit::Stone,
    ];

    fn code(self) -> i32 {
        self as i32
    }

    fn name(self) -> &'static str {
        match self {
            WeightUnit::Microgram => "Microgram",
            WeightUnit::Milligram => "Milligram",
            WeightUnit::Gram => "Gram",
            WeightUnit::Kilogram => "Kilogram",
            WeightUnit::Ounce => "Ounce",
            WeightUnit::Pound => "Pound",
            WeightUnit::Stone => "Stone",
        }
    }

    fn factor(self) -> f64 {
        match self {
            WeightUnit::Microgram => G_PER_UG,
            WeightUnit::Milligram => G_PER_MG,
            WeightUnit::Gram => 1.0,
            WeightUnit::Kilogram => G_PER_KG,
            WeightUnit::Ounce => G_PER_OZ,
            WeightUnit::Pound => G_PER_LB,
            WeightUnit::Stone => G_PER_ST,
        }
    }
}

/// A raw unit code tagged with its domain.
///
/// Codes come straight off the wire and may name no unit at all (callers use
/// `-1` as a sentinel); resolution is deferred to the conversion table.
pub struct UnitCode<U> {
    raw: i32,
    _domain: PhantomData<fn() -> U>,
}

impl<U: UnitTable> UnitCode<U> {
    /// Wrap an arbitrary wire code
    pub fn raw(code: i32) -> Self {
        Self {
            raw: code,
            _domain: PhantomData,
        }
    }

    /// The wire code
    pub fn value(self) -> i32 {
        self.raw
    }

    /// The unit this code names, if any
    pub fn resolve(self) -> Option<U> {
        U::from_code(self.raw)
    }
}

impl<U> Clone for UnitCode<U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<U> Copy for UnitCode<U> {}

impl<U> PartialEq for UnitCode<U> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<U> Eq for UnitCode<U> {}

impl<U> fmt::Debug for UnitCode<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitCode({})", self.raw)
    }
}

impl<U: UnitTable> From<U> for UnitCode<U> {
    fn from(unit: U) -> Self {
        Self::raw(unit.code())
    }
}

/// Unit name when the code resolves, the bare number otherwise
impl<U: UnitTable> fmt::Display for UnitCode<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolve() {
            Some(unit) => f.write_str(unit.name()),
            None => write!(f, "{}", self.raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_codes_follow_declaration_order() {
        for (index, unit) in VolumeUnit::ALL.iter().enumerate() {
            assert_eq!(unit.code(), index as i32);
        }
        assert_eq!(VolumeUnit::Gallon.code(), 7);
    }

    #[test]
    fn test_weight_codes_follow_declaration_order() {
        for (index, unit) in WeightUnit::ALL.iter().enumerate() {
            assert_eq!(unit.code(), index as i32);
        }
        assert_eq!(WeightUnit::Stone.code(), 6);
    }

    #[test]
    fn test_base_units_have_unit_factor() {
        assert_eq!(VolumeUnit::Liter.factor(), 1.0);
        assert_eq!(WeightUnit::Gram.factor(), 1.0);
    }

    #[test]
    fn test_factors() {
        assert_eq!(VolumeUnit::Cup.factor(), 0.24);
        assert_eq!(VolumeUnit::Quart.factor(), 0.946353);
        assert_eq!(WeightUnit::Microgram.factor(), 0.000001);
        assert_eq!(WeightUnit::Stone.factor(), 6350.29);
        assert!(VolumeUnit::ALL.iter().all(|u| u.factor() > 0.0));
        assert!(WeightUnit::ALL.iter().all(|u| u.factor() > 0.0));
    }

    #[test]
    fn test_from_code() {
        assert_eq!(VolumeUnit::from_code(2), Some(VolumeUnit::Deciliter));
        assert_eq!(WeightUnit::from_code(5), Some(WeightUnit::Pound));
        assert_eq!(VolumeUnit::from_code(8), None);
        assert_eq!(WeightUnit::from_code(-1), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(VolumeUnit::from_name("cubicmeter"), Some(VolumeUnit::CubicMeter));
        assert_eq!(WeightUnit::from_name(" Ounce "), Some(WeightUnit::Ounce));
        assert_eq!(WeightUnit::from_name("tonne"), None);
    }

    #[test]
    fn test_unit_code_display() {
        let known: UnitCode<VolumeUnit> = VolumeUnit::Cup.into();
        let unknown: UnitCode<VolumeUnit> = UnitCode::raw(-1);
        assert_eq!(known.to_string(), "Cup");
        assert_eq!(unknown.to_string(), "-1");
        assert_eq!(unknown.resolve(), None);
    }
}
