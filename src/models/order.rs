use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::errors::{BindingResult, ErrorCode, PaymentError, Validate};

/// Lifecycle state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: u64,
    pub sku: String,
    pub quantity: u32,
    pub email: String,
    pub status: OrderStatus,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
}

impl Order {
    /// Reference used in payment failures, e.g. `ORDER-7`
    pub fn reference(&self) -> String {
        format!("ORDER-{}", self.id)
    }
}

/// Body of `POST /orders`
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub sku: Option<String>,
    pub quantity: Option<i64>,
    pub email: Option<String>,
}

pub const MAX_QUANTITY: i64 = 100;

impl Validate for CreateOrderRequest {
    fn validate(&self) -> BindingResult {
        let mut result = BindingResult::new("createOrderRequest");

        match self.sku.as_deref() {
            Some(sku) if !sku.trim().is_empty() => {}
            other => {
                result.reject("sku", other, "must not be blank");
            }
        }

        match self.quantity {
            Some(q) if (1..=MAX_QUANTITY).contains(&q) => {}
            other => {
                result.reject(
                    "quantity",
                    other,
                    format!("must be between 1 and {MAX_QUANTITY}"),
                );
            }
        }

        match self.email.as_deref() {
            Some(email) if email.contains('@') => {}
            other => {
                result.reject("email", other, "must be a well-formed email address");
            }
        }

        result
    }
}

/// In-memory order book
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: RwLock<BTreeMap<u64, Order>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self, status: OrderStatus) -> Vec<Order> {
        self.orders
            .read()
            .await
            .values()
            .filter(|o| o.status == status)
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: u64) -> Option<Order> {
        self.orders.read().await.get(&id).cloned()
    }

    /// Store a validated request as a new pending order
    pub async fn create(&self, sku: String, quantity: u32, email: String) -> Order {
        let mut orders = self.orders.write().await;
        let id = orders.keys().next_back().map_or(1, |last| last + 1);
        let order = Order {
            id,
            sku,
            quantity,
            email,
            status: OrderStatus::Pending,
            created_at: Local::now().naive_local(),
        };
        orders.insert(id, order.clone());
        order
    }

    /// Mark a pending order as paid.
    ///
    /// Returns `None` for unknown orders. Paying a non-pending order is a
    /// payment failure reported against the order reference.
    pub async fn pay(&self, id: u64) -> Option<Result<Order, PaymentError>> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(&id)?;

        let outcome = match order.status {
            OrderStatus::Pending => {
                order.status = OrderStatus::Paid;
                Ok(order.clone())
            }
            OrderStatus::Paid => Err(PaymentError::for_order(
                ErrorCode::BadRequest,
                order.reference(),
            )),
            OrderStatus::Cancelled => Err(PaymentError::for_order(
                ErrorCode::Forbidden,
                order.reference(),
            )),
        };
        Some(outcome)
    }

    pub async fn cancel(&self, id: u64) -> Option<Order> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(&id)?;
        order.status = OrderStatus::Cancelled;
        Some(order.clone())
    }
}
