//! Operation requests
//!
//! A single conversion request (function plus operands), independent of how
//! it arrived. Used by the HTTP layer to validate, run, and describe a call.

use super::converter::{ConversionError, ConversionResult, QuantityCalculator};
use super::units::{UnitCode, UnitTable};
use crate::models::ConverterFunction;

/// One request against a domain calculator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation<U: UnitTable> {
    Convert {
        value: f64,
        from: UnitCode<U>,
        to: UnitCode<U>,
    },
    Add {
        a: f64,
        a_unit: UnitCode<U>,
        b: f64,
        b_unit: UnitCode<U>,
        result_unit: UnitCode<U>,
    },
    Subtract {
        a: f64,
        a_unit: UnitCode<U>,
        b: f64,
        b_unit: UnitCode<U>,
        result_unit: UnitCode<U>,
    },
    Scale {
        value: f64,
        unit: UnitCode<U>,
        factor: f64,
        result_unit: UnitCode<U>,
    },
    Difference {
        a: f64,
        a_unit: UnitCode<U>,
        b: f64,
        b_unit: UnitCode<U>,
        result_unit: UnitCode<U>,
    },
    Percentage {
        a: f64,
        part: UnitCode<U>,
        b: f64,
        whole: UnitCode<U>,
    },
}

impl<U: UnitTable> Operation<U> {
    pub fn function(&self) -> ConverterFunction {
        match self {
            Operation::Convert { .. } => ConverterFunction::Convert,
            Operation::Add { .. } => ConverterFunction::Add,
            Operation::Subtract { .. } => ConverterFunction::Subtract,
            Operation::Scale { .. } => ConverterFunction::Scale,
            Operation::Difference { .. } => ConverterFunction::Difference,
            Operation::Percentage { .. } => ConverterFunction::Percentage,
        }
    }

    /// Every unit the request names
    pub fn units(&self) -> Vec<UnitCode<U>> {
        match *self {
            Operation::Convert { from, to, .. } => vec![from, to],
            Operation::Add { a_unit, b_unit, result_unit, .. }
            | Operation::Subtract { a_unit, b_unit, result_unit, .. }
            | Operation::Difference { a_unit, b_unit, result_unit, .. } => {
                vec![a_unit, b_unit, result_unit]
            }
            Operation::Scale { unit, result_unit, .. } => vec![unit, result_unit],
            Operation::Percentage { part, whole, .. } => vec![part, whole],
        }
    }

    /// Fails with `UnsupportedUnit` if any named unit is unknown to the domain
    pub fn ensure_supported(&self) -> ConversionResult<()> {
        if self.units().iter().all(|u| u.resolve().is_some()) {
            Ok(())
        } else {
            Err(ConversionError::unsupported::<U>())
        }
    }

    /// Human-readable action text recorded in the history
    pub fn describe(&self) -> String {
        match self {
            Operation::Convert { value, from, to } => {
                format!("convert: {} {} to {}", value, from, to)
            }
            Operation::Add { a, a_unit, b, b_unit, result_unit } => {
                format!("add: {} {} + {} {} in {}", a, a_unit, b, b_unit, result_unit)
            }
            Operation::Subtract { a, a_unit, b, b_unit, result_unit } => {
                format!("subtract: {} {} - {} {} in {}", a, a_unit, b, b_unit, result_unit)
            }
            Operation::Scale { value, unit, factor, result_unit } => {
                format!("scale: {} {} * {} in {}", value, unit, factor, result_unit)
            }
            Operation::Difference { a, a_unit, b, b_unit, result_unit } => {
                format!("difference: {} {} - {} {} in {}", a, a_unit, b, b_unit, result_unit)
            }
            Operation::Percentage { a, part, b, whole } => {
                format!("percentage: {} {} / {} {}", a, part, b, whole)
            }
        }
    }

    /// Run the request against a calculator
    pub fn apply(&self, calculator: &dyn QuantityCalculator<U>) -> ConversionResult<f64> {
        match *self {
            Operation::Convert { value, from, to } => calculator.convert(value, from, to),
            Operation::Add { a, a_unit, b, b_unit, result_unit } => {
                calculator.add_values(a, a_unit, b, b_unit, result_unit)
            }
            Operation::Subtract { a, a_unit, b, b_unit, result_unit } => {
                calculator.subtract_values(a, a_unit, b, b_unit, result_unit)
            }
            Operation::Scale { value, unit, factor, result_unit } => {
                calculator.scale_value(value, unit, factor, result_unit)
            }
            Operation::Difference { a, a_unit, b, b_unit, result_unit } => {
                calculator.difference(a, a_unit, b, b_unit, result_unit)
            }
            Operation::Percentage { a, part, b, whole } => {
                calculator.percentage_of(a, part, b, whole)
            }
        }
    }
}

/// Format a result with four decimals and a `.` separator, e.g. `0.1000`
pub fn format_result(value: f64) -> String {
    format!("{:.4}", value)
}
