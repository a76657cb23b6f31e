//! Order request/response models
//!
//! `Order` is the domain record returned by the API. It is kept separate from
//! the `orders` table row; `Order::from_row` and `Order::to_row` convert
//! between the two.

use std::fmt;
use std::str::FromStr;

use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::entities::orders;

/// Lifecycle status of an order. Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Created,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Created,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Order as exposed over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_email: String,
    pub item: String,
    pub status: OrderStatus,
}

impl Order {
    pub fn from_row(row: orders::Model) -> Result<Self, UnknownStatus> {
        Ok(Self {
            id: row.id,
            status: row.status.parse()?,
            customer_email: row.customer_email,
            item: row.item,
        })
    }

    pub fn to_row(&self) -> orders::ActiveModel {
        orders::ActiveModel {
            id: Set(self.id),
            customer_email: Set(self.customer_email.clone()),
            item: Set(self.item.clone()),
            status: Set(self.status.as_str().to_string()),
        }
    }
}

/// A validated order that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_email: String,
    pub item: String,
}

impl NewOrder {
    /// Row for insertion; the id is left to the database.
    pub fn to_row(&self) -> orders::ActiveModel {
        orders::ActiveModel {
            customer_email: Set(self.customer_email.clone()),
            item: Set(self.item.clone()),
            status: Set(OrderStatus::default().as_str().to_string()),
            ..Default::default()
        }
    }
}

/// Body of `POST /orders/`. Fields are optional so that missing ones are
/// reported by validation alongside any other field errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub item: Option<String>,
}

/// Body of `PUT /orders/{order_id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub status: Option<String>,
}
