//! Synthetic order generation for local development

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::StoreResult;
use crate::order_store::OrderStore;
use crate::types::{Order, OrderStatus, PaymentMethod};

pub const DEFAULT_SEED_COUNT: usize = 500;

const FIRST_NAMES: &[&str] = &[
    "Olivia", "Liam", "Emma", "Noah", "Ava", "Elijah", "Sophia", "Mateo", "Isabella", "Lucas",
    "Mia", "Amara", "Hiro", "Priya", "Diego", "Fatima", "Chen", "Ingrid", "Kwame", "Sofia",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Garcia", "Nguyen", "Patel", "Kim", "Okafor", "Rossi", "Müller",
    "Hernandez", "Brown", "Silva", "Cohen", "Tanaka", "Larsen", "Dubois", "Walker", "Khan",
];

const VEHICLES: &[(&str, &[&str])] = &[
    ("Toyota", &["Corolla", "Camry", "RAV4", "Tacoma", "Prius"]),
    ("Honda", &["Civic", "Accord", "CR-V", "Pilot"]),
    ("Ford", &["F-150", "Mustang", "Explorer", "Escape"]),
    ("Chevrolet", &["Silverado", "Malibu", "Equinox", "Bolt"]),
    ("Tesla", &["Model 3", "Model Y", "Model S"]),
    ("BMW", &["3 Series", "X3", "X5"]),
    ("Subaru", &["Outback", "Forester", "Impreza"]),
    ("Hyundai", &["Elantra", "Tucson", "Ioniq 5"]),
];

const COLORS: &[&str] = &[
    "black", "white", "silver", "gray", "red", "blue", "green", "orange", "yellow", "maroon",
];

const STREETS: &[&str] = &[
    "Main St", "Oak Ave", "Maple Dr", "Cedar Ln", "Elm St", "Pine Rd", "Lakeview Blvd",
    "Sunset Way", "Hillcrest Ct", "Park Pl",
];

const CITIES: &[(&str, &str)] = &[
    ("Phoenix", "AZ"),
    ("Austin", "TX"),
    ("Denver", "CO"),
    ("Atlanta", "GA"),
    ("Seattle", "WA"),
    ("Columbus", "OH"),
    ("Raleigh", "NC"),
    ("Tampa", "FL"),
    ("Portland", "OR"),
    ("Nashville", "TN"),
];

const VIN_CHARS: &[u8] = b"ABCDEFGHJKLMNPRSTUVWXYZ0123456789";

fn pick<'a, R: Rng>(rng: &mut R, items: &'a [&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn money<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    (rng.gen_range(min..=max) * 100.0).round() / 100.0
}

fn vin<R: Rng>(rng: &mut R) -> String {
    (0..17)
        .map(|_| VIN_CHARS[rng.gen_range(0..VIN_CHARS.len())] as char)
        .collect()
}

/// One random order placed within the year before `now`
pub fn random_order<R: Rng>(rng: &mut R, order_id: i64, now: DateTime<Utc>) -> Order {
    let first_name = pick(rng, FIRST_NAMES);
    let last_name = pick(rng, LAST_NAMES);
    let (make, models) = VEHICLES.choose(rng).copied().unwrap_or(VEHICLES[0]);
    let (city, state) = CITIES.choose(rng).copied().unwrap_or(CITIES[0]);
    let ordered_at = now - Duration::minutes(rng.gen_range(60..=365 * 24 * 60));

    let mut order = Order {
        id: 0,
        order_id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!(
            "{}.{}{}@example.com",
            first_name.to_lowercase(),
            last_name.to_lowercase(),
            rng.gen_range(1..1000)
        ),
        status: OrderStatus::Ordered,
        payment_method: *PaymentMethod::ALL.choose(rng).unwrap_or(&PaymentMethod::Visa),
        price: money(rng, 100.0, 50_000.0),
        tax: money(rng, 5.0, 2_000.0),
        delivery_fee: money(rng, 0.0, 100.0),
        ordered_at,
        paid_at: None,
        in_transit_at: None,
        delivered_at: None,
        make: make.to_string(),
        car_model: pick(rng, models).to_string(),
        year: rng.gen_range(2000..=2025),
        color: pick(rng, COLORS).to_string(),
        vin: vin(rng),
        address: format!("{} {}", rng.gen_range(1..10_000), pick(rng, STREETS)),
        city: city.to_string(),
        state: state.to_string(),
        zip: rng.gen_range(10_000..=99_999),
    };

    let target = *OrderStatus::ALL.choose(rng).unwrap_or(&OrderStatus::Ordered);
    let path: &[OrderStatus] = match target {
        OrderStatus::Ordered => &[],
        OrderStatus::Failed => &[OrderStatus::Failed],
        OrderStatus::Paid => &[OrderStatus::Paid],
        OrderStatus::InTransit => &[OrderStatus::Paid, OrderStatus::InTransit],
        OrderStatus::Delivered => &[
            OrderStatus::Paid,
            OrderStatus::InTransit,
            OrderStatus::Delivered,
        ],
    };

    let mut at = ordered_at;
    for status in path {
        let remaining = (now - at).num_minutes().max(1);
        at += Duration::minutes(rng.gen_range(1..=remaining.min(3 * 24 * 60)));
        order.advance_status(*status, at.min(now));
    }
    order
}

/// Append `count` random orders, numbering them after the highest `orderID`
pub fn seed_orders<R: Rng>(store: &OrderStore, rng: &mut R, count: usize) -> StoreResult<Vec<Order>> {
    let next_order_id = store.max_order_id().unwrap_or(0) + 1;
    let now = Utc::now();

    let orders = (0..count as i64)
        .map(|offset| random_order(rng, next_order_id + offset, now))
        .collect();
    let inserted = store.insert_many(orders)?;

    tracing::info!(count = inserted.len(), first_order_id = next_order_id, "seeded orders");
    Ok(inserted)
}
