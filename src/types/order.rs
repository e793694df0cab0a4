//! Order document types

use async_graphql::{ComplexObject, SimpleObject, ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "ordered")]
    Ordered,
    #[serde(rename = "paid")]
    Paid,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "in transit")]
    InTransit,
    #[serde(rename = "delivered")]
    Delivered,
}

impl OrderStatus {
    /// All statuses, in lifecycle order
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Ordered,
        OrderStatus::Paid,
        OrderStatus::Failed,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "ordered",
            OrderStatus::Paid => "paid",
            OrderStatus::Failed => "failed",
            OrderStatus::InTransit => "in transit",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an order was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Visa,
    Mastercard,
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Visa,
        PaymentMethod::Mastercard,
        PaymentMethod::Cash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Visa => "visa",
            PaymentMethod::Mastercard => "mastercard",
            PaymentMethod::Cash => "cash",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order record held in the document store
///
/// `id` is assigned by the store on insert and is the sort and cursor key.
/// Status transition timestamps are written once and never cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct Order {
    #[graphql(skip)]
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "orderID")]
    #[graphql(name = "orderID")]
    pub order_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[graphql(skip)]
    pub status: OrderStatus,
    #[graphql(skip)]
    pub payment_method: PaymentMethod,
    pub price: f64,
    pub tax: f64,
    pub delivery_fee: f64,
    pub ordered_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_transit_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    pub make: String,
    pub car_model: String,
    pub year: i32,
    pub color: String,
    pub vin: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: i32,
}

#[ComplexObject]
impl Order {
    #[graphql(name = "id")]
    async fn graphql_id(&self) -> ID {
        ID(self.id.to_string())
    }

    #[graphql(name = "status")]
    async fn graphql_status(&self) -> &'static str {
        self.status.as_str()
    }

    #[graphql(name = "paymentMethod")]
    async fn graphql_payment_method(&self) -> &'static str {
        self.payment_method.as_str()
    }
}

impl Order {
    /// Move the order to `status`, stamping the matching transition time.
    ///
    /// A transition timestamp that is already set is kept as is.
    pub fn advance_status(&mut self, status: OrderStatus, at: DateTime<Utc>) {
        let slot = match status {
            OrderStatus::Paid => Some(&mut self.paid_at),
            OrderStatus::InTransit => Some(&mut self.in_transit_at),
            OrderStatus::Delivered => Some(&mut self.delivered_at),
            OrderStatus::Ordered | OrderStatus::Failed => None,
        };
        if let Some(slot) = slot {
            slot.get_or_insert(at);
        }
        self.status = status;
    }
}

#[cfg(test)]
pub(crate) fn sample_order(order_id: i64) -> Order {
    Order {
        id: 0,
        order_id,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        status: OrderStatus::Ordered,
        payment_method: PaymentMethod::Visa,
        price: 1000.0,
        tax: 80.0,
        delivery_fee: 20.0,
        ordered_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default(),
        paid_at: None,
        in_transit_at: None,
        delivered_at: None,
        make: "Toyota".to_string(),
        car_model: "Corolla".to_string(),
        year: 2019,
        color: "red".to_string(),
        vin: "1HGCM82633A004352".to_string(),
        address: "1 Main St".to_string(),
        city: "Phoenix".to_string(),
        state: "AZ".to_string(),
        zip: 85001,
    }
}
