use anyhow::Context;
use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use super::extract::{PathParams, ValidJson, ValidQuery};
use crate::advice::AppError;
use crate::errors::{BindingResult, BusinessError, ConstraintViolation, ErrorCode, ErrorResponse, Validate};
use crate::models::{CreateOrderRequest, Order, OrderStatus, OrderStore};

lazy_static::lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub orders: OrderStore,
    pub instance_id: String,
}

pub const MAX_PAGE_SIZE: u32 = 100;

/// Order listing parameters
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    /// Status to filter by (required)
    pub status: OrderStatus,
    /// Page number, starting at 1
    pub page: Option<u32>,
    /// Results per page (max 100)
    pub size: Option<u32>,
}

impl Validate for ListOrdersParams {
    fn validate(&self) -> BindingResult {
        let mut result = BindingResult::new("listOrdersParams");
        if let Some(size) = self.size.filter(|s| *s > MAX_PAGE_SIZE) {
            result.reject("size", Some(size), format!("must be at most {MAX_PAGE_SIZE}"));
        }
        result
    }
}

#[derive(Debug, Deserialize)]
pub struct OrderPath {
    pub id: u64,
}

/// Page of orders
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderPage {
    pub data: Vec<Order>,
    pub page: u32,
    pub size: u32,
    pub total: usize,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = serde_json::Value)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "error-advice",
        "version": env!("CARGO_PKG_VERSION"),
        "instance_id": state.instance_id,
        "uptime_seconds": START_TIME.elapsed().as_secs(),
    }))
}

/// List orders with a given status
#[utoipa::path(
    get,
    path = "/orders",
    tag = "orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "Orders page", body = OrderPage),
        (status = 400, description = "Invalid parameter", body = ErrorResponse)
    )
)]
pub async fn list_orders(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<ListOrdersParams>,
) -> Result<Json<OrderPage>, AppError> {
    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(AppError::ConstraintViolation(vec![ConstraintViolation::new(
            "listOrders.params.page",
            "must be greater than or equal to 1",
        )]));
    }
    let size = params.size.unwrap_or(20);

    let orders = state.orders.list(params.status).await;
    let total = orders.len();
    let data = orders
        .into_iter()
        .skip((page as usize - 1).saturating_mul(size as usize))
        .take(size as usize)
        .collect();

    info!(status = ?params.status, page, size, total, "Listed orders");

    Ok(Json(OrderPage {
        data,
        page,
        size,
        total,
    }))
}

/// Get a single order
#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = u64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 400, description = "Id is not a number", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    PathParams(path): PathParams<OrderPath>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .get(path.id)
        .await
        .ok_or(BusinessError::new(ErrorCode::NotFound))?;
    Ok(Json(order))
}

/// Create an order
#[utoipa::path(
    post,
    path = "/orders",
    tag = "orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(sku), Some(quantity), Some(email)) = (request.sku, request.quantity, request.email)
    else {
        return Err(AppError::IllegalArgument(
            "validated order request is incomplete".to_string(),
        ));
    };
    let quantity = u32::try_from(quantity)
        .map_err(|_| AppError::IllegalArgument(format!("quantity {quantity} out of range")))?;

    let order = state.orders.create(sku, quantity, email).await;
    info!(order_id = order.id, "Created order");

    Ok((StatusCode::CREATED, Json(order)))
}

/// Pay an order
#[utoipa::path(
    post,
    path = "/orders/{id}/payment",
    tag = "orders",
    params(("id" = u64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order paid", body = Order),
        (status = 400, description = "Order already paid", body = ErrorResponse),
        (status = 403, description = "Order cancelled", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
pub async fn pay_order(
    State(state): State<AppState>,
    PathParams(path): PathParams<OrderPath>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .pay(path.id)
        .await
        .ok_or(BusinessError::new(ErrorCode::NotFound))??;
    info!(order_id = order.id, "Order paid");
    Ok(Json(order))
}

/// Cancel an order; restricted to the admin role
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = u64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order cancelled", body = Order),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    PathParams(path): PathParams<OrderPath>,
) -> Result<Json<Order>, AppError> {
    let role = headers.get("x-role").and_then(|v| v.to_str().ok());
    if role != Some("admin") {
        return Err(AppError::AccessDenied(format!(
            "role {:?} may not cancel orders",
            role.unwrap_or("none")
        )));
    }

    let order = state
        .orders
        .cancel(path.id)
        .await
        .ok_or(BusinessError::new(ErrorCode::NotFound))?;
    Ok(Json(order))
}

/// Echo the caller's bearer token subject
#[utoipa::path(
    get,
    path = "/me",
    tag = "session",
    responses(
        (status = 200, description = "Caller identity", body = serde_json::Value),
        (status = 401, description = "No credentials", body = ErrorResponse)
    )
)]
pub async fn me(headers: HeaderMap) -> Result<Json<serde_json::Value>, AppError> {
    let subject = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Authentication("missing bearer token".to_string()))?;

    Ok(Json(serde_json::json!({ "subject": subject })))
}

/// Always fails with an internal error
pub async fn fail() -> Result<(), AppError> {
    let reading: Result<String, std::io::Error> = Err(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "ledger.csv missing",
    ));
    reading.context("loading ledger")?;
    Ok(())
}

/// Always panics
pub async fn panicking() -> &'static str {
    panic!("handler invariant broken")
}

/// Fallback for unknown routes
pub async fn not_found(method: Method) -> AppError {
    info!(%method, "No route matched");
    BusinessError::new(ErrorCode::NotFound).into()
}
