//! Tracing decorator for calculators
//!
//! Wraps any [`QuantityCalculator`] so each call runs inside a span and emits
//! start / success / failure events, keeping the engine itself free of logging.

use tracing::{debug, debug_span, error};

use super::converter::{ConversionResult, QuantityCalculator};
use super::units::{UnitCode, UnitTable};

/// A calculator that logs every call it forwards
#[derive(Debug, Clone)]
pub struct Traced<C> {
    inner: C,
    component: &'static str,
}

impl<C> Traced<C> {
    /// Wrap `inner`; `component` names it in log output (e.g. "VolumeConverter")
    pub fn new(inner: C, component: &'static str) -> Self {
        Self { inner, component }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    fn observe<T: std::fmt::Debug>(
        &self,
        method: &'static str,
        call: impl FnOnce(&C) -> ConversionResult<T>,
    ) -> ConversionResult<T> {
        let span = debug_span!("conversion", component = self.component, method);
        let _entered = span.enter();

        debug!("Starting - [method:{}] [class:{}]", method, self.component);
        let outcome = call(&self.inner);
        match &outcome {
            Ok(value) => debug!(?value, "Success - [method:{}]", method),
            Err(e) => error!("Failed - [method:{}] with error-message: {}", method, e),
        }
        outcome
    }
}

impl<U, C> QuantityCalculator<U> for Traced<C>
where
    U: UnitTable,
    C: QuantityCalculator<U>,
{
    fn convert(&self, value: f64, from: UnitCode<U>, to: UnitCode<U>) -> ConversionResult<f64> {
        self.observe("convert", |c| c.convert(value, from, to))
    }

    fn add_values(
        &self,
        first: f64,
        first_unit: UnitCode<U>,
        second: f64,
        second_unit: UnitCode<U>,
        result_unit: UnitCode<U>,
    ) -> ConversionResult<f64> {
        self.observe("add_values", |c| {
            c.add_values(first, first_unit, second, second_unit, result_unit)
        })
    }

    fn subtract_values(
        &self,
        first: f64,
        first_unit: UnitCode<U>,
        second: f64,
        second_unit: UnitCode<U>,
        result_unit: UnitCode<U>,
    ) -> ConversionResult<f64> {
        self.observe("subtract_values", |c| {
            c.subtract_values(first, first_unit, second, second_unit, result_unit)
        })
    }

    fn scale_value(
        &self,
        value: f64,
        unit: UnitCode<U>,
        factor: f64,
        result_unit: UnitCode<U>,
    ) -> ConversionResult<f64> {
        self.observe("scale_value", |c| c.scale_value(value, unit, factor, result_unit))
    }

    fn difference(
        &self,
        first: f64,
        first_unit: UnitCode<U>,
        second: f64,
        second_unit: UnitCode<U>,
        result_unit: UnitCode<U>,
    ) -> ConversionResult<f64> {
        self.observe("difference", |c| {
            c.difference(first, first_unit, second, second_unit, result_unit)
        })
    }

    fn percentage_of(
        &self,
        value: f64,
        unit: UnitCode<U>,
        total: f64,
        total_unit: UnitCode<U>,
    ) -> ConversionResult<f64> {
        self.observe("percentage_of", |c| c.percentage_of(value, unit, total, total_unit))
    }
}
