use utoipa::OpenApi;

use crate::api::handlers::{ListOrdersParams, OrderPage};
use crate::errors::{ErrorCode, ErrorResponse, FieldError};
use crate::models::{CreateOrderRequest, Order, OrderStatus};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Error Advice",
        version = "0.1.0",
        description = "Orders service whose failures are all reported through one structured error payload: a stable code, a message, field-level details and a log id for server-side lookup.",
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::list_orders,
        crate::api::handlers::get_order,
        crate::api::handlers::create_order,
        crate::api::handlers::pay_order,
        crate::api::handlers::cancel_order,
        crate::api::handlers::me,
    ),
    components(
        schemas(
            ErrorCode,
            ErrorResponse,
            FieldError,
            Order,
            OrderStatus,
            OrderPage,
            CreateOrderRequest,
            ListOrdersParams,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "orders", description = "Order management endpoints"),
        (name = "session", description = "Caller identity"),
    )
)]
pub struct ApiDoc;
