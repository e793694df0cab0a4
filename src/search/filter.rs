//! Order search filter construction
//!
//! A free-text term is turned into an OR of per-field conditions. Text
//! fields get a case-insensitive substring match; numeric fields only take
//! part when the whole term parses as an integer, and then match exactly.

use std::str::FromStr;

use serde_json::{json, Value};

use crate::error::QueryError;
use crate::types::Order;

/// Order fields a search can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    OrderId,
    FirstName,
    LastName,
    Email,
    Status,
    PaymentMethod,
    Make,
    CarModel,
    Color,
    Vin,
    Address,
    City,
    State,
    Year,
    Zip,
}

impl SearchField {
    /// Fields searched when the caller does not name any
    pub const DEFAULT: [SearchField; 13] = [
        SearchField::OrderId,
        SearchField::FirstName,
        SearchField::LastName,
        SearchField::Email,
        SearchField::Status,
        SearchField::PaymentMethod,
        SearchField::Make,
        SearchField::CarModel,
        SearchField::Color,
        SearchField::Vin,
        SearchField::Address,
        SearchField::City,
        SearchField::State,
    ];

    /// Field name as it appears in the GraphQL schema and stored documents
    pub fn name(&self) -> &'static str {
        match self {
            SearchField::OrderId => "orderID",
            SearchField::FirstName => "firstName",
            SearchField::LastName => "lastName",
            SearchField::Email => "email",
            SearchField::Status => "status",
            SearchField::PaymentMethod => "paymentMethod",
            SearchField::Make => "make",
            SearchField::CarModel => "carModel",
            SearchField::Color => "color",
            SearchField::Vin => "vin",
            SearchField::Address => "address",
            SearchField::City => "city",
            SearchField::State => "state",
            SearchField::Year => "year",
            SearchField::Zip => "zip",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SearchField::OrderId | SearchField::Year | SearchField::Zip
        )
    }

    fn text<'a>(&self, order: &'a Order) -> Option<&'a str> {
        let value = match self {
            SearchField::FirstName => &order.first_name,
            SearchField::LastName => &order.last_name,
            SearchField::Email => &order.email,
            SearchField::Status => return Some(order.status.as_str()),
            SearchField::PaymentMethod => return Some(order.payment_method.as_str()),
            SearchField::Make => &order.make,
            SearchField::CarModel => &order.car_model,
            SearchField::Color => &order.color,
            SearchField::Vin => &order.vin,
            SearchField::Address => &order.address,
            SearchField::City => &order.city,
            SearchField::State => &order.state,
            SearchField::OrderId | SearchField::Year | SearchField::Zip => return None,
        };
        Some(value.as_str())
    }

    fn number(&self, order: &Order) -> Option<i64> {
        match self {
            SearchField::OrderId => Some(order.order_id),
            SearchField::Year => Some(i64::from(order.year)),
            SearchField::Zip => Some(i64::from(order.zip)),
            _ => None,
        }
    }
}

impl FromStr for SearchField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchField::DEFAULT
            .iter()
            .chain([SearchField::Year, SearchField::Zip].iter())
            .find(|field| field.name() == s)
            .copied()
            .ok_or_else(|| QueryError::UnknownSearchField(s.to_string()))
    }
}

/// A single per-field clause of the OR
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Case-insensitive substring; `needle` is stored lowercased
    Contains { field: SearchField, needle: String },
    /// Exact integer equality on a numeric field
    Equals { field: SearchField, value: i64 },
}

impl Condition {
    fn matches(&self, order: &Order) -> bool {
        match self {
            Condition::Contains { field, needle } => field
                .text(order)
                .map(|text| text.to_lowercase().contains(needle.as_str()))
                .unwrap_or(false),
            Condition::Equals { field, value } => field.number(order) == Some(*value),
        }
    }

    fn to_document(&self) -> Value {
        match self {
            Condition::Contains { field, needle } => {
                json!({ field.name(): { "$regex": regex::escape(needle), "$options": "i" } })
            }
            Condition::Equals { field, value } => json!({ field.name(): value }),
        }
    }
}

/// Compiled search over order documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    /// No search term: every document matches
    All,
    /// At least one condition must hold. An empty list matches nothing.
    AnyOf(Vec<Condition>),
}

impl SearchFilter {
    /// Build a filter from the raw `search` / `searchFields` arguments.
    ///
    /// An empty or missing term yields [`SearchFilter::All`]. Field names are
    /// validated even when they end up contributing no condition.
    pub fn build(search: Option<&str>, fields: Option<&[String]>) -> Result<Self, QueryError> {
        let fields: Vec<SearchField> = match fields {
            Some(names) if !names.is_empty() => names
                .iter()
                .map(|name| name.parse())
                .collect::<Result<_, _>>()?,
            _ => SearchField::DEFAULT.to_vec(),
        };

        let term = match search {
            Some(term) if !term.is_empty() => term,
            _ => return Ok(SearchFilter::All),
        };

        let numeric = term.trim().parse::<i64>().ok();
        let needle = term.to_lowercase();

        let conditions = fields
            .into_iter()
            .filter_map(|field| {
                if field.is_numeric() {
                    numeric.map(|value| Condition::Equals { field, value })
                } else {
                    Some(Condition::Contains {
                        field,
                        needle: needle.clone(),
                    })
                }
            })
            .collect();

        Ok(SearchFilter::AnyOf(conditions))
    }

    pub fn matches(&self, order: &Order) -> bool {
        match self {
            SearchFilter::All => true,
            SearchFilter::AnyOf(conditions) => conditions.iter().any(|c| c.matches(order)),
        }
    }

    pub fn conditions(&self) -> &[Condition] {
        match self {
            SearchFilter::All => &[],
            SearchFilter::AnyOf(conditions) => conditions,
        }
    }

    /// Render as a Mongo-style filter document, used for query logging
    pub fn to_document(&self) -> Value {
        match self {
            SearchFilter::All => json!({}),
            SearchFilter::AnyOf(conditions) => {
                let clauses: Vec<Value> = conditions.iter().map(Condition::to_document).collect();
                json!({ "$or": clauses })
            }
        }
    }
}
