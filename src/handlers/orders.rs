//! HTTP handlers for `/orders`
//!
//! The `Staff` extractor is declared before the body, so an unauthorized
//! request is rejected with 403 before its payload is looked at. Body and
//! path rejections are folded into the 422 validation envelope.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{ApiError, FieldError};
use crate::models::order::{CreateOrderRequest, Order, UpdateOrderRequest};
use crate::services::access::Staff;
use crate::services::validation::{validate_create, validate_update};
use crate::AppState;

fn body_error(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection, "Rejected order payload");
    ApiError::Validation(vec![FieldError::new("body", "invalid JSON body")])
}

fn path_error(rejection: PathRejection) -> ApiError {
    tracing::debug!(error = %rejection, "Rejected order id");
    ApiError::Validation(vec![FieldError::new("order_id", "value is not a valid integer")])
}

pub async fn create_order(
    State(state): State<AppState>,
    staff: Staff,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let Json(payload) = payload.map_err(body_error)?;
    let new_order = validate_create(payload).map_err(ApiError::Validation)?;

    let order = state.orders.create_order(&staff, new_order).await?;
    tracing::info!(order_id = order.id, "Order created");

    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update_order(
    State(state): State<AppState>,
    staff: Staff,
    order_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateOrderRequest>, JsonRejection>,
) -> Result<Json<Order>, ApiError> {
    let Path(order_id) = order_id.map_err(path_error)?;
    let Json(payload) = payload.map_err(body_error)?;
    let status = validate_update(payload).map_err(ApiError::Validation)?;

    let order = state.orders.update_order(&staff, order_id, status).await?;
    tracing::info!(order_id = order.id, status = %order.status, "Order updated");

    Ok(Json(order))
}

pub async fn get_order(
    State(state): State<AppState>,
    order_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Order>, ApiError> {
    let Path(order_id) = order_id.map_err(path_error)?;
    let order = state.orders.get_order(order_id).await?;
    Ok(Json(order))
}
