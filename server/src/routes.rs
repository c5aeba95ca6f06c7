//! `/api` routes.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use oc_rates_common::{ConversionResult, Currency, RatesResponse};
use oc_rates_fx::RatesService;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::ApiError;

/// Shared handler state.
pub type AppState = Arc<RatesService>;

/// Query string as raw pairs, in request order.
type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

/// Query for `GET /api/rates`.
#[derive(Debug, Default)]
pub struct RatesQuery {
    pub base: Option<String>,
}

impl RatesQuery {
    fn from_params(mut params: HashMap<String, String>) -> Self {
        Self {
            base: params.remove("base"),
        }
    }
}

/// Query for `GET /api/convert`.
#[derive(Debug, Default)]
pub struct ConvertQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<String>,
}

impl ConvertQuery {
    fn from_params(mut params: HashMap<String, String>) -> Self {
        Self {
            from: params.remove("from"),
            to: params.remove("to"),
            amount: params.remove("amount"),
        }
    }
}

/// Build the application router.
pub fn router(service: AppState) -> Router {
    let api = Router::new()
        .route("/rates", get(get_rates))
        .route("/convert", get(convert))
        .with_state(service);

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn get_rates(
    State(service): State<AppState>,
    query: QueryPairs,
) -> Result<Json<RatesResponse>, ApiError> {
    let query = RatesQuery::from_params(query_params(query)?);
    let base = currency_or(query.base, Currency::eur());

    match service.get_rates(&base).await {
        Ok(rates) => Ok(Json(rates)),
        Err(e) => {
            error!(base = %base, error = %e, "Error fetching rates");
            Err(e.into())
        }
    }
}

async fn convert(
    State(service): State<AppState>,
    query: QueryPairs,
) -> Result<Json<ConversionResult>, ApiError> {
    let query = ConvertQuery::from_params(query_params(query)?);
    let from = currency_or(query.from, Currency::eur());
    let to = currency_or(query.to, Currency::usd());
    let amount = parse_amount(query.amount.as_deref());

    match service.convert(from.clone(), to.clone(), amount).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            error!(from = %from, to = %to, error = %e, cause = %e.cause(), "Error converting currency");
            Err(e.into())
        }
    }
}

/// Query parameters keyed by name. A repeated key keeps its first value.
fn query_params(query: QueryPairs) -> Result<HashMap<String, String>, ApiError> {
    let Query(pairs) = query.map_err(|rejection| {
        let message = rejection.body_text();
        error!(error = %message, "Invalid query string");
        ApiError::new(message)
    })?;

    let mut params = HashMap::new();
    for (key, value) in pairs {
        params.entry(key).or_insert(value);
    }
    Ok(params)
}

/// Currency from a query value, `default` when missing or blank.
fn currency_or(value: Option<String>, default: Currency) -> Currency {
    value
        .filter(|v| !v.trim().is_empty())
        .map(Currency::new)
        .unwrap_or(default)
}

/// Amount from a query value; anything that is not a finite number is 0.
///
/// The whole value must parse: `"12abc"` is 0, not 12.
fn parse_amount(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
