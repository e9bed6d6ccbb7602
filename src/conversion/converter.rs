//! Conversion engine
//!
//! Every operation routes its operands through the domain's base unit,
//! performs the arithmetic there, and converts the result back into the
//! caller's unit.

use std::collections::HashMap;

use thiserror::Error;

use super::units::{UnitCode, UnitTable};

/// Input validation failures raised by the engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Invalid, value(s) must be non-negative for conversion.")]
    NegativeValue,

    #[error("Invalid, value(s) must be higher than zero.")]
    NonPositiveValue,

    #[error("Invalid, value(s) must be finite numbers.")]
    NonFiniteValue,

    #[error("Unsupported {domain} unit.")]
    UnsupportedUnit { domain: &'static str },
}

impl ConversionError {
    pub fn unsupported<U: UnitTable>() -> Self {
        ConversionError::UnsupportedUnit { domain: U::DOMAIN }
    }
}

/// Result type for engine operations
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Reject negative magnitudes, then non-finite ones
fn require_non_negative(values: &[f64]) -> ConversionResult<()> {
    if values.iter().any(|v| *v < 0.0) {
        return Err(ConversionError::NegativeValue);
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ConversionError::NonFiniteValue);
    }
    Ok(())
}

/// Reject zero or negative magnitudes, then non-finite ones
fn require_positive(values: &[f64]) -> ConversionResult<()> {
    if values.iter().any(|v| *v <= 0.0) {
        return Err(ConversionError::NonPositiveValue);
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ConversionError::NonFiniteValue);
    }
    Ok(())
}

/// Finite inputs can still overflow or divide by an underflowed zero
fn finite_result(value: f64) -> ConversionResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConversionError::NonFiniteValue)
    }
}

/// Scale factors for one domain, keyed by wire code
#[derive(Debug, Clone)]
pub struct UnitConversionTable<U: UnitTable> {
    factors: HashMap<i32, f64>,
    _domain: std::marker::PhantomData<U>,
}

impl<U: UnitTable> UnitConversionTable<U> {
    /// Build the table from every unit the domain declares
    pub fn new() -> Self {
        Self {
            factors: U::ALL.iter().map(|u| (u.code(), u.factor())).collect(),
            _domain: std::marker::PhantomData,
        }
    }

    fn factor(&self, unit: UnitCode<U>) -> ConversionResult<f64> {
        self.factors
            .get(&unit.value())
            .copied()
            .ok_or_else(ConversionError::unsupported::<U>)
    }

    /// Express `value` of `unit` in the base unit
    pub fn to_base(&self, value: f64, unit: UnitCode<U>) -> ConversionResult<f64> {
        finite_result(value * self.factor(unit)?)
    }

    /// Express a base-unit magnitude in `unit`
    pub fn from_base(&self, value_in_base: f64, unit: UnitCode<U>) -> ConversionResult<f64> {
        finite_result(value_in_base / self.factor(unit)?)
    }

    /// Number of units in the table
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

impl<U: UnitTable> Default for UnitConversionTable<U> {
    fn default() -> Self {
        Self::new()
    }
}

/// The operation set shared by every quantity domain
pub trait QuantityCalculator<U: UnitTable>: Send + Sync {
    /// Convert a value between two units
    fn convert(&self, value: f64, from: UnitCode<U>, to: UnitCode<U>) -> ConversionResult<f64>;

    /// Sum of two quantities, expressed in `result_unit`
    fn add_values(
        &self,
        first: f64,
        first_unit: UnitCode<U>,
        second: f64,
        second_unit: UnitCode<U>,
        result_unit: UnitCode<U>,
    ) -> ConversionResult<f64>;

    /// Absolute difference of two quantities, expressed in `result_unit`
    fn subtract_values(
        &self,
        first: f64,
        first_unit: UnitCode<U>,
        second: f64,
        second_unit: UnitCode<U>,
        result_unit: UnitCode<U>,
    ) -> ConversionResult<f64>;

    /// A quantity multiplied by a non-negative factor, expressed in `result_unit`
    fn scale_value(
        &self,
        value: f64,
        unit: UnitCode<U>,
        factor: f64,
        result_unit: UnitCode<U>,
    ) -> ConversionResult<f64>;

    /// Absolute difference of two quantities, expressed in `result_unit`
    fn difference(
        &self,
        first: f64,
        first_unit: UnitCode<U>,
        second: f64,
        second_unit: UnitCode<U>,
        result_unit: UnitCode<U>,
    ) -> ConversionResult<f64>;

    /// `value` as a percentage of `total`
    fn percentage_of(
        &self,
        value: f64,
        unit: UnitCode<U>,
        total: f64,
        total_unit: UnitCode<U>,
    ) -> ConversionResult<f64>;
}

/// Table-driven converter for one domain
#[derive(Debug, Clone)]
pub struct Converter<U: UnitTable> {
    table: UnitConversionTable<U>,
}

impl<U: UnitTable> Default for Converter<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: UnitTable> Converter<U> {
    pub fn new() -> Self {
        Self {
            table: UnitConversionTable::new(),
        }
    }

    pub fn table(&self) -> &UnitConversionTable<U> {
        &self.table
    }

    fn absolute_difference(
        &self,
        first: f64,
        first_unit: UnitCode<U>,
        second: f64,
        second_unit: UnitCode<U>,
        result_unit: UnitCode<U>,
    ) -> ConversionResult<f64> {
        require_non_negative(&[first, second])?;

        let first_base = self.table.to_base(first, first_unit)?;
        let second_base = self.table.to_base(second, second_unit)?;
        self.table.from_base((first_base - second_base).abs(), result_unit)
    }
}

impl<U: UnitTable> QuantityCalculator<U> for Converter<U> {
    fn convert(&self, value: f64, from: UnitCode<U>, to: UnitCode<U>) -> ConversionResult<f64> {
        require_non_negative(&[value])?;

        // Same unit short-circuits before any table lookup
        if from == to {
            return Ok(value);
        }

        let base = self.table.to_base(value, from)?;
        self.table.from_base(base, to)
    }

    fn add_values(
        &self,
        first: f64,
        first_unit: UnitCode<U>,
        second: f64,
        second_unit: UnitCode<U>,
        result_unit: UnitCode<U>,
    ) -> ConversionResult<f64> {
        require_non_negative(&[first, second])?;

        let first_base = self.table.to_base(first, first_unit)?;
        let second_base = self.table.to_base(second, second_unit)?;
        self.table.from_base(first_base + second_base, result_unit)
    }

    fn subtract_values(
        &self,
        first: f64,
        first_unit: UnitCode<U>,
        second: f64,
        second_unit: UnitCode<U>,
        result_unit: UnitCode<U>,
    ) -> ConversionResult<f64> {
        self.absolute_difference(first, first_unit, second, second_unit, result_unit)
    }

    fn scale_value(
        &self,
        value: f64,
        unit: UnitCode<U>,
        factor: f64,
        result_unit: UnitCode<U>,
    ) -> ConversionResult<f64> {
        require_non_negative(&[value, factor])?;

        let base = self.table.to_base(value, unit)?;
        self.table.from_base(base * factor, result_unit)
    }

    fn difference(
        &self,
        first: f64,
        first_unit: UnitCode<U>,
        second: f64,
        second_unit: UnitCode<U>,
        result_unit: UnitCode<U>,
    ) -> ConversionResult<f64> {
        self.absolute_difference(first, first_unit, second, second_unit, result_unit)
    }

    fn percentage_of(
        &self,
        value: f64,
        unit: UnitCode<U>,
        total: f64,
        total_unit: UnitCode<U>,
    ) -> ConversionResult<f64> {
        require_positive(&[value, total])?;

        let value_base = self.table.to_base(value, unit)?;
        let total_base = self.table.to_base(total, total_unit)?;
        finite_result((value_base / total_base) * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::units::{VolumeUnit, WeightUnit};
    use crate::conversion::{VolumeConverter, WeightConverter};

    use crate::conversion::units::VolumeUnit::*;

    fn approx(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    fn bogus_volume() -> UnitCode<VolumeUnit> {
        UnitCode::raw(-1)
    }

    #[test]
    fn test_table_round_trip() {
        let table = UnitConversionTable::<VolumeUnit>::new();
        assert_eq!(table.len(), VolumeUnit::ALL.len());
        assert!(approx(table.to_base(250.0, Milliliter.into()).unwrap(), 0.25));
        assert!(approx(table.from_base(0.25, Milliliter.into()).unwrap(), 250.0));
    }

    #[test]
    fn test_table_rejects_unknown_code() {
        let table = UnitConversionTable::<WeightUnit>::new();
        let err = table.to_base(1.0, UnitCode::raw(42)).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported weight unit.");
    }

    #[test]
    fn test_convert_deciliter_to_cup() {
        let converter = VolumeConverter::new();
        let result = converter.convert(1.0, Deciliter.into(), Cup.into()).unwrap();
        assert!((result - 0.4167).abs() < 0.01);
    }

    #[test]
    fn test_convert_same_unit_returns_value() {
        let converter = VolumeConverter::new();
        assert_eq!(converter.convert(10.0, Liter.into(), Liter.into()).unwrap(), 10.0);
        assert_eq!(converter.convert(0.0, Liter.into(), Liter.into()).unwrap(), 0.0);
    }

    #[test]
    fn test_convert_same_unsupported_unit_bypasses_table() {
        let converter = VolumeConverter::new();
        assert_eq!(converter.convert(3.0, bogus_volume(), bogus_volume()).unwrap(), 3.0);
    }

    #[test]
    fn test_convert_round_trip_all_units() {
        let converter = VolumeConverter::new();
        for from in VolumeUnit::ALL {
            for to in VolumeUnit::ALL {
                let there = converter.convert(12.5, (*from).into(), (*to).into()).unwrap();
                let back = converter.convert(there, (*to).into(), (*from).into()).unwrap();
                assert!((back - 12.5).abs() < 1e-9, "{:?} -> {:?}", from, to);
            }
        }
    }

    #[test]
    fn test_convert_negative_value() {
        let converter = VolumeConverter::new();
        let err = converter.convert(-1.0, Liter.into(), Liter.into()).unwrap_err();
        assert_eq!(err, ConversionError::NegativeValue);
        assert_eq!(err.to_string(), "Invalid, value(s) must be non-negative for conversion.");
    }

    #[test]
    fn test_negative_check_precedes_unit_lookup() {
        let converter = VolumeConverter::new();
        let err = converter.convert(-1.0, Liter.into(), bogus_volume()).unwrap_err();
        assert_eq!(err, ConversionError::NegativeValue);
    }

    #[test]
    fn test_convert_unsupported_unit() {
        let converter = VolumeConverter::new();
        let err = converter.convert(1.0, Liter.into(), bogus_volume()).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported volume unit.");
    }

    #[test]
    fn test_convert_rejects_non_finite() {
        let converter = VolumeConverter::new();
        let err = converter.convert(f64::NAN, Liter.into(), Cup.into()).unwrap_err();
        assert_eq!(err, ConversionError::NonFiniteValue);
        let err = converter.convert(f64::NEG_INFINITY, Liter.into(), Cup.into()).unwrap_err();
        assert_eq!(err, ConversionError::NegativeValue);
    }

    #[test]
    fn test_add_values() {
        let converter = VolumeConverter::new();
        let result = converter
            .add_values(500.0, Milliliter.into(), 5.0, Deciliter.into(), Liter.into())
            .unwrap();
        assert!(approx(result, 1.0));
    }

    #[test]
    fn test_add_values_second_unit_unsupported() {
        let converter = VolumeConverter::new();
        let err = converter
            .add_values(1.0, Liter.into(), 1.0, bogus_volume(), Liter.into())
            .unwrap_err();
        assert_eq!(err, ConversionError::unsupported::<VolumeUnit>());
    }

    #[test]
    fn test_subtract_values_is_absolute() {
        let converter = VolumeConverter::new();
        let forward = converter
            .subtract_values(500.0, Milliliter.into(), 2.0, Deciliter.into(), Liter.into())
            .unwrap();
        let backward = converter
            .subtract_values(2.0, Deciliter.into(), 500.0, Milliliter.into(), Liter.into())
            .unwrap();
        assert!(approx(forward, 0.3));
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_subtract_values_negative() {
        let converter = VolumeConverter::new();
        let err = converter
            .subtract_values(1.0, Liter.into(), -2.0, Liter.into(), Liter.into())
            .unwrap_err();
        assert_eq!(err, ConversionError::NegativeValue);
    }

    #[test]
    fn test_scale_value() {
        let converter = VolumeConverter::new();
        let result = converter
            .scale_value(2.0, Liter.into(), 3.0, Milliliter.into())
            .unwrap();
        assert!(approx(result, 6000.0));
    }

    #[test]
    fn test_scale_by_zero() {
        let converter = VolumeConverter::new();
        let result = converter.scale_value(7.0, Gallon.into(), 0.0, Cup.into()).unwrap();
        assert_eq!(result, 0.0);
    }

    #[test]
    fn test_scale_negative_factor() {
        let converter = VolumeConverter::new();
        let err = converter
            .scale_value(1.0, Liter.into(), -3.0, Liter.into())
            .unwrap_err();
        assert_eq!(err, ConversionError::NegativeValue);
    }

    #[test]
    fn test_difference() {
        let converter = VolumeConverter::new();
        let result = converter
            .difference(1.0, Liter.into(), 4.0, Deciliter.into(), Milliliter.into())
            .unwrap();
        assert!(approx(result, 600.0));
    }

    #[test]
    fn test_percentage_of() {
        let converter = VolumeConverter::new();
        let result = converter
            .percentage_of(2.0, Liter.into(), 0.5, Liter.into())
            .unwrap();
        assert!(approx(result, 400.0));
    }

    #[test]
    fn test_percentage_rejects_zero() {
        let converter = VolumeConverter::new();
        let err = converter
            .percentage_of(0.0, Liter.into(), 1.0, Liter.into())
            .unwrap_err();
        assert_eq!(err, ConversionError::NonPositiveValue);
        assert_eq!(err.to_string(), "Invalid, value(s) must be higher than zero.");

        let err = converter
            .percentage_of(1.0, Liter.into(), -1.0, Liter.into())
            .unwrap_err();
        assert_eq!(err, ConversionError::NonPositiveValue);
    }

    #[test]
    fn test_weight_convert() {
        let converter = WeightConverter::new();
        let result = converter
            .convert(1.0, WeightUnit::Kilogram.into(), WeightUnit::Pound.into())
            .unwrap();
        assert!((result - 2.2046).abs() < 0.001);
    }

    #[test]
    fn test_weight_add_and_percentage() {
        let converter = WeightConverter::new();
        let sum = converter
            .add_values(
                500.0,
                WeightUnit::Gram.into(),
                0.5,
                WeightUnit::Kilogram.into(),
                WeightUnit::Kilogram.into(),
            )
            .unwrap();
        assert!(approx(sum, 1.0));

        let pct = converter
            .percentage_of(250.0, WeightUnit::Gram.into(), 1.0, WeightUnit::Kilogram.into())
            .unwrap();
        assert!(approx(pct, 25.0));
    }

    #[test]
    fn test_weight_unsupported_unit() {
        let converter = WeightConverter::new();
        let err = converter
            .scale_value(1.0, UnitCode::raw(-1), 2.0, WeightUnit::Gram.into())
            .unwrap_err();
        assert_eq!(err.to_string(), "Unsupported weight unit.");
    }

    #[test]
    fn test_weight_round_trip_all_units() {
        let converter = WeightConverter::new();
        for from in WeightUnit::ALL {
            let same = converter.convert(12.5, (*from).into(), (*from).into()).unwrap();
            assert_eq!(same, 12.5);
            for to in WeightUnit::ALL {
                let there = converter.convert(12.5, (*from).into(), (*to).into()).unwrap();
                let back = converter.convert(there, (*to).into(), (*from).into()).unwrap();
                assert!((back - 12.5).abs() < 1e-9, "{:?} -> {:?}", from, to);
            }
        }
    }

    /// Runs all six operations with the same operands; the second operand is
    /// the factor for `scale_value`
    fn every_operation<U: UnitTable>(
        converter: &Converter<U>,
        first: (f64, UnitCode<U>),
        second: (f64, UnitCode<U>),
        result_unit: UnitCode<U>,
    ) -> Vec<(&'static str, ConversionResult<f64>)> {
        let (a, a_unit) = first;
        let (b, b_unit) = second;
        vec![
            ("convert", converter.convert(a, a_unit, result_unit)),
            ("add_values", converter.add_values(a, a_unit, b, b_unit, result_unit)),
            ("subtract_values", converter.subtract_values(a, a_unit, b, b_unit, result_unit)),
            ("scale_value", converter.scale_value(a, a_unit, b, result_unit)),
            ("difference", converter.difference(a, a_unit, b, b_unit, result_unit)),
            ("percentage_of", converter.percentage_of(a, a_unit, b, b_unit)),
        ]
    }

    fn assert_every_operation_rejects_negative<U: UnitTable>() {
        let converter = Converter::<U>::new();
        let unit = UnitCode::from(U::ALL[0]);
        let other = UnitCode::from(U::ALL[1]);

        for (first, second) in [(-1.0, 1.0), (1.0, -1.0)] {
            for (name, outcome) in every_operation(&converter, (first, unit), (second, other), other) {
                let expected = match name {
                    // convert has no second operand
                    "convert" if first >= 0.0 => continue,
                    "percentage_of" => ConversionError::NonPositiveValue,
                    _ => ConversionError::NegativeValue,
                };
                assert_eq!(outcome, Err(expected), "{} ({}, {}) in {}", name, first, second, U::DOMAIN);
            }
        }
    }

    #[test]
    fn test_every_operation_rejects_negative() {
        assert_every_operation_rejects_negative::<VolumeUnit>();
        assert_every_operation_rejects_negative::<WeightUnit>();
    }

    fn assert_every_operation_rejects_unknown_unit<U: UnitTable>() {
        let converter = Converter::<U>::new();
        let good = UnitCode::from(U::ALL[1]);
        let bad = UnitCode::<U>::raw(-1);
        let unsupported = Err(ConversionError::unsupported::<U>());

        for (name, outcome) in every_operation(&converter, (1.0, bad), (1.0, good), good) {
            assert_eq!(outcome, unsupported, "{} first unit in {}", name, U::DOMAIN);
        }

        for (name, outcome) in every_operation(&converter, (1.0, good), (1.0, bad), good) {
            if matches!(name, "convert" | "scale_value") {
                continue;
            }
            assert_eq!(outcome, unsupported, "{} second unit in {}", name, U::DOMAIN);
        }

        for (name, outcome) in every_operation(&converter, (1.0, good), (1.0, good), bad) {
            if name == "percentage_of" {
                continue;
            }
            assert_eq!(outcome, unsupported, "{} result unit in {}", name, U::DOMAIN);
        }
    }

    #[test]
    fn test_every_operation_rejects_unknown_unit() {
        assert_every_operation_rejects_unknown_unit::<VolumeUnit>();
        assert_every_operation_rejects_unknown_unit::<WeightUnit>();
    }

    #[test]
    fn test_non_finite_results_are_rejected() {
        use crate::conversion::units::WeightUnit::{Gram, Microgram, Stone};

        let converter = WeightConverter::new();

        // Both totals underflow to zero grams: 0 / 0
        let err = converter
            .percentage_of(1e-320, Microgram.into(), 1e-320, Microgram.into())
            .unwrap_err();
        assert_eq!(err, ConversionError::NonFiniteValue);

        // Total underflows to zero grams: 1 / 0
        let err = converter
            .percentage_of(1.0, Gram.into(), 1e-320, Microgram.into())
            .unwrap_err();
        assert_eq!(err, ConversionError::NonFiniteValue);

        let err = converter.convert(1e308, Stone.into(), Microgram.into()).unwrap_err();
        assert_eq!(err, ConversionError::NonFiniteValue);

        let err = converter
            .add_values(f64::MAX, Gram.into(), f64::MAX, Gram.into(), Gram.into())
            .unwrap_err();
        assert_eq!(err, ConversionError::NonFiniteValue);

        let err = converter
            .scale_value(1e300, Gram.into(), 1e300, Gram.into())
            .unwrap_err();
        assert_eq!(err, ConversionError::NonFiniteValue);
    }
}
