//! Conversion tools
//!
//! Runs one operation for the HTTP layer: validates the named units, applies
//! the calculator, formats the result, and records it in the history.

use tracing::{debug, error, info};

use crate::conversion::{
    format_result, ConversionResult, Operation, QuantityCalculator, UnitTable,
};
use crate::db::Database;
use crate::tools::history;

/// Run `op` and return the formatted result
pub async fn run_operation<U: UnitTable>(
    calculator: &dyn QuantityCalculator<U>,
    db: &Database,
    op: Operation<U>,
) -> ConversionResult<String> {
    let method = op.function().as_str();
    debug!("Starting - [method:{}] [domain:{}]", method, U::DOMAIN);

    let outcome = op.ensure_supported().and_then(|_| op.apply(calculator));
    let result = match outcome {
        Ok(value) => format_result(value),
        Err(e) => {
            error!("Failed - [method:{}] with error-message: {}", method, e);
            return Err(e);
        }
    };

    let action = op.describe();
    history::save_conversion(db, action.clone(), result.clone()).await;

    info!(
        "Success - [method:{}] with action: action = {} - result = {}.",
        method, action, result
    );
    Ok(result)
}
