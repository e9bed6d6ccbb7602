//! Converter HTTP Server
//!
//! Routes, shared state, and handlers for the converter API. Every endpoint is
//! a `GET` with query parameters; conversion results are JSON strings.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::conversion::{
    Operation, QuantityCalculator, Traced, UnitCode, UnitTable, VolumeConverter, VolumeUnit,
    WeightConverter, WeightUnit,
};
use crate::db::Database;
use crate::features::FeatureToggle;
use crate::models::{ConverterFunction, ConverterType};
use crate::tools::status::StatusTracker;
use crate::tools::{conversions, enums, history};

/// Code used for unit names that match no unit
const UNKNOWN_UNIT: i32 = -1;

/// Shared service state
#[derive(Clone)]
pub struct AppState {
    volume: Arc<dyn QuantityCalculator<VolumeUnit>>,
    weight: Arc<dyn QuantityCalculator<WeightUnit>>,
    database: Database,
    toggles: Arc<dyn FeatureToggle>,
    status_tracker: StatusTracker,
    history_limit: i64,
}

impl AppState {
    /// State with traced volume and weight converters
    pub fn new(
        database: Database,
        toggles: Arc<dyn FeatureToggle>,
        status_tracker: StatusTracker,
        history_limit: i64,
    ) -> Self {
        Self {
            volume: Arc::new(Traced::new(VolumeConverter::new(), "VolumeConverter")),
            weight: Arc::new(Traced::new(WeightConverter::new(), "WeightConverter")),
            database,
            toggles,
            status_tracker,
            history_limit,
        }
    }
}

/// A unit domain served under its own route prefix
pub trait Domain: UnitTable {
    const CONVERTER_TYPE: ConverterType;

    fn calculator(state: &AppState) -> Arc<dyn QuantityCalculator<Self>>;
}

impl Domain for VolumeUnit {
    const CONVERTER_TYPE: ConverterType = ConverterType::Volume;

    fn calculator(state: &AppState) -> Arc<dyn QuantityCalculator<Self>> {
        Arc::clone(&state.volume)
    }
}

impl Domain for WeightUnit {
    const CONVERTER_TYPE: ConverterType = ConverterType::Weight;

    fn calculator(state: &AppState) -> Arc<dyn QuantityCalculator<Self>> {
        Arc::clone(&state.weight)
    }
}

// ============================================================================
// Query Parameter Structs
// ============================================================================

/// A unit given either as its wire code (`"3"`) or its name (`"Liter"`)
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct UnitParam(String);

impl UnitParam {
    fn code<U: UnitTable>(&self) -> UnitCode<U> {
        let raw = self.0.trim();
        if let Ok(code) = raw.parse::<i32>() {
            return UnitCode::raw(code);
        }
        U::from_name(raw)
            .map(UnitCode::from)
            .unwrap_or_else(|| UnitCode::raw(UNKNOWN_UNIT))
    }
}

#[derive(Debug, Deserialize)]
pub struct ConvertParams {
    pub value: f64,
    pub from: UnitParam,
    pub to: UnitParam,
}

/// Parameters shared by add, subtract, and difference
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairParams {
    pub a: f64,
    pub a_unit: UnitParam,
    pub b: f64,
    pub b_unit: UnitParam,
    pub result_unit: UnitParam,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleParams {
    pub value: f64,
    pub value_unit: UnitParam,
    pub factor: f64,
    pub result_unit: UnitParam,
}

#[derive(Debug, Deserialize)]
pub struct PercentageParams {
    pub a: f64,
    pub part: UnitParam,
    pub b: f64,
    pub whole: UnitParam,
}

// ============================================================================
// Router
// ============================================================================

fn domain_routes<U: Domain>() -> Router<AppState> {
    let path = |f: ConverterFunction| format!("/{}", f.route());

    Router::new()
        .route(&path(ConverterFunction::Convert), get(convert::<U>))
        .route(&path(ConverterFunction::Add), get(add::<U>))
        .route(&path(ConverterFunction::Subtract), get(subtract::<U>))
        .route(&path(ConverterFunction::Scale), get(scale::<U>))
        .route(&path(ConverterFunction::Difference), get(difference::<U>))
        .route(&path(ConverterFunction::Percentage), get(percentage::<U>))
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let prefix = |t: ConverterType| format!("/api/{}", t.route());

    Router::new()
        .nest(&prefix(VolumeUnit::CONVERTER_TYPE), domain_routes::<VolumeUnit>())
        .nest(&prefix(WeightUnit::CONVERTER_TYPE), domain_routes::<WeightUnit>())
        .route("/api/enums", get(list_enums))
        .route("/api/memory", get(get_memory))
        .route("/api/status", get(get_status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Run a conversion; engine errors become 400 with the error text
async fn respond<U: Domain>(state: &AppState, op: Operation<U>) -> Response {
    let calculator = U::calculator(state);
    match conversions::run_operation(calculator.as_ref(), &state.database, op).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

async fn convert<U: Domain>(
    State(state): State<AppState>,
    Query(p): Query<ConvertParams>,
) -> Response {
    let op = Operation::<U>::Convert {
        value: p.value,
        from: p.from.code(),
        to: p.to.code(),
    };
    respond(&state, op).await
}

async fn add<U: Domain>(State(state): State<AppState>, Query(p): Query<PairParams>) -> Response {
    let op = Operation::<U>::Add {
        a: p.a,
        a_unit: p.a_unit.code(),
        b: p.b,
        b_unit: p.b_unit.code(),
        result_unit: p.result_unit.code(),
    };
    respond(&state, op).await
}

async fn subtract<U: Domain>(
    State(state): State<AppState>,
    Query(p): Query<PairParams>,
) -> Response {
    let op = Operation::<U>::Subtract {
        a: p.a,
        a_unit: p.a_unit.code(),
        b: p.b,
        b_unit: p.b_unit.code(),
        result_unit: p.result_unit.code(),
    };
    respond(&state, op).await
}

async fn scale<U: Domain>(State(state): State<AppState>, Query(p): Query<ScaleParams>) -> Response {
    let op = Operation::<U>::Scale {
        value: p.value,
        unit: p.value_unit.code(),
        factor: p.factor,
        result_unit: p.result_unit.code(),
    };
    respond(&state, op).await
}

async fn difference<U: Domain>(
    State(state): State<AppState>,
    Query(p): Query<PairParams>,
) -> Response {
    let op = Operation::<U>::Difference {
        a: p.a,
        a_unit: p.a_unit.code(),
        b: p.b,
        b_unit: p.b_unit.code(),
        result_unit: p.result_unit.code(),
    };
    respond(&state, op).await
}

async fn percentage<U: Domain>(
    State(state): State<AppState>,
    Query(p): Query<PercentageParams>,
) -> Response {
    let op = Operation::<U>::Percentage {
        a: p.a,
        part: p.part.code(),
        b: p.b,
        whole: p.whole.code(),
    };
    respond(&state, op).await
}

async fn list_enums(State(state): State<AppState>) -> Response {
    Json(enums::list_enums(state.toggles.as_ref()).await).into_response()
}

async fn get_memory(State(state): State<AppState>) -> Response {
    Json(history::fetch_conversion_logs(&state.database, state.history_limit).await).into_response()
}

async fn get_status(State(state): State<AppState>) -> Response {
    let tracker = state.status_tracker.clone();
    let database = state.database.clone();

    match tokio::task::spawn_blocking(move || tracker.get_status(&database)).await {
        Ok(status) => Json(status).into_response(),
        Err(e) => {
            tracing::error!("Failed - [method:get_status] with error-message: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while reading status.",
            )
                .into_response()
        }
    }
}
