//! Structural validation of create/update payloads
//!
//! Every violation is collected so that a rejected request lists all of its
//! offending fields at once.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::FieldError;
use crate::models::order::{CreateOrderRequest, NewOrder, OrderStatus, UpdateOrderRequest};

/// Max item length, in characters
pub const MAX_ITEM_LENGTH: usize = 100;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$"
    )
    .expect("email regex is valid");
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_create(req: CreateOrderRequest) -> Result<NewOrder, Vec<FieldError>> {
    let mut errors = Vec::new();

    match req.customer_email.as_deref() {
        None => errors.push(FieldError::new("customer_email", "field required")),
        Some(email) if !is_valid_email(email) => errors.push(FieldError::new(
            "customer_email",
            "value is not a valid email address",
        )),
        Some(_) => {}
    }

    match req.item.as_deref().map(|item| item.chars().count()) {
        None => errors.push(FieldError::new("item", "field required")),
        Some(0) => errors.push(FieldError::new("item", "must not be empty")),
        Some(len) if len > MAX_ITEM_LENGTH => errors.push(FieldError::new(
            "item",
            format!("must be at most {} characters", MAX_ITEM_LENGTH),
        )),
        Some(_) => {}
    }

    match (req.customer_email, req.item) {
        (Some(customer_email), Some(item)) if errors.is_empty() => Ok(NewOrder {
            customer_email,
            item,
        }),
        _ => Err(errors),
    }
}

pub fn validate_update(req: UpdateOrderRequest) -> Result<OrderStatus, Vec<FieldError>> {
    let raw = req
        .status
        .ok_or_else(|| vec![FieldError::new("status", "field required")])?;

    raw.parse().map_err(|_| {
        let allowed = OrderStatus::ALL
            .iter()
            .map(|s| format!("'{}'", s))
            .collect::<Vec<_>>()
            .join(", ");
        vec![FieldError::new(
            "status",
            format!("must be one of {}", allowed),
        )]
    })
}
