use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::config::SERVICE;
use crate::domain::PricePoint;
use crate::forecast::HorizonOutcome;
use crate::service::error::ApiError;
use crate::service::ops::{self, FetchDataRequest, PredictRequest, ValidateQuery};
use crate::service::AppContext;
use crate::utils::format_store_timestamp;

type ApiResult = Result<Json<Value>, ApiError>;

pub fn routes() -> Router<Arc<AppContext>> {
    Router::new()
        .route("/", get(root))
        .route("/fetch-data", post(fetch_data))
        .route("/clear-database", post(clear_database))
        .route("/train-model", post(train_model))
        .route("/predict-days-profit", post(predict_days_profit))
        .route("/validate-data", get(validate_data))
}

fn fail(ctx: &AppContext) -> impl Fn(crate::error::HorizonError) -> ApiError + '_ {
    move |e| ApiError::from_failure(e, ctx.config.distinct_status_codes)
}

fn row_json(p: &PricePoint) -> Value {
    json!({
        "timestamp": format_store_timestamp(p.timestamp),
        "close": p.close,
    })
}

async fn root() -> Json<Value> {
    Json(json!({
        "msg": SERVICE.title,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Parameters come from a JSON body when one is sent, otherwise from the query string.
async fn fetch_data(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<FetchDataRequest>,
    body: Option<Json<FetchDataRequest>>,
) -> ApiResult {
    let req = body.map_or(query, |Json(r)| r);
    let report = ops::fetch_data(&ctx, &req).await.map_err(fail(&ctx))?;

    Ok(Json(json!({
        "status": "OK",
        "rows_inserted": report.rows_fetched,
        "rows_new": report.rows_new,
    })))
}

async fn clear_database(State(ctx): State<Arc<AppContext>>) -> ApiResult {
    ops::clear_database(&ctx).await.map_err(fail(&ctx))?;
    Ok(Json(json!({ "status": "OK", "message": "Database cleared." })))
}

async fn train_model(State(ctx): State<Arc<AppContext>>) -> ApiResult {
    let summary = ops::train_model(&ctx).await.map_err(fail(&ctx))?;
    Ok(Json(json!({
        "status": "trained",
        "last_date": format_store_timestamp(summary.last_date),
        "last_price": summary.last_price,
        "rows_used": summary.rows_used,
    })))
}

async fn predict_days_profit(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<PredictRequest>,
) -> ApiResult {
    let forecast = ops::predict_days_profit(&ctx, &req)
        .await
        .map_err(fail(&ctx))?;

    let body = match forecast.outcome {
        HorizonOutcome::Reached { days, date, yhat } => json!({
            "days_needed": days,
            "target_date": format_store_timestamp(date),
            "forecast_price": yhat,
            "price_target": forecast.price_target,
            "last_close": forecast.last_close,
        }),
        HorizonOutcome::NotReached => json!({
            "days_needed": Value::Null,
            "status": "Target profit not reached.",
            "price_target": forecast.price_target,
            "last_close": forecast.last_close,
            "peak_forecast": forecast.peak.map(|p| json!({
                "date": format_store_timestamp(p.date),
                "yhat": p.yhat,
                "yhat_lower": p.yhat_lower,
                "yhat_upper": p.yhat_upper,
            })),
        }),
    };
    Ok(Json(body))
}

async fn validate_data(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<ValidateQuery>,
) -> ApiResult {
    let report = ops::validate_data(&ctx, &query).await.map_err(fail(&ctx))?;
    Ok(Json(json!({
        "row_count": report.row_count,
        "first_rows": report.first_rows.iter().map(row_json).collect::<Vec<_>>(),
        "last_rows": report.last_rows.iter().map(row_json).collect::<Vec<_>>(),
    })))
}
