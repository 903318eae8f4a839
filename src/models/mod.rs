pub mod order;

pub use order::{CreateOrderRequest, Order, OrderStatus, OrderStore};
