use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use serde::Serialize;

/// Mock weather conditions for one city.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherRecord {
    pub temperature_c: i32,
    pub condition: &'static str,
    pub humidity_pct: u8,
    pub wind_kmh: u32,
}

/// One catalog entry. Serialized as-is inside search results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProductRecord {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub price_usd: f64,
    pub rating: f64,
    pub in_stock: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderStatus {
    Processing,
    Shipped,
    #[serde(rename = "In Transit")]
    InTransit,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRecord {
    pub status: OrderStatus,
    pub placed: NaiveDate,
    pub estimated_delivery: Option<NaiveDate>,
    pub delivered: Option<NaiveDate>,
    pub carrier: Option<&'static str>,
    pub tracking: Option<&'static str>,
}

/// City (lower-case) to weather. Lookups are exact on the normalized name.
pub static WEATHER: [(&str, WeatherRecord); 8] = [
    ("london", weather(12, "Cloudy", 78, 18)),
    ("tokyo", weather(22, "Sunny", 55, 10)),
    ("new york", weather(8, "Rainy", 82, 25)),
    ("sydney", weather(28, "Sunny", 45, 14)),
    ("berlin", weather(5, "Snowy", 90, 20)),
    ("seattle", weather(10, "Drizzle", 85, 12)),
    ("paris", weather(14, "Partly Cloudy", 65, 15)),
    ("dubai", weather(38, "Sunny", 30, 8)),
];

/// Catalog in display order. Search falls back to a prefix of this slice.
pub static PRODUCTS: [ProductRecord; 10] = [
    product("P001", "Wireless Noise-Cancelling Headphones", "Electronics", 149.99, 4.7, true),
    product("P002", "Ergonomic Mechanical Keyboard", "Electronics", 89.99, 4.5, true),
    product("P003", "USB-C 4-Port Hub", "Electronics", 24.99, 4.3, true),
    product("P004", "Standing Desk Converter", "Furniture", 199.00, 4.6, false),
    product("P005", "Laptop Stand with Cooling Fan", "Electronics", 39.99, 4.2, true),
    product("P006", "27-inch 4K Monitor", "Electronics", 449.00, 4.8, true),
    product("P007", "Mesh Office Chair", "Furniture", 299.00, 4.4, true),
    product("P008", "Portable Phone Charger 20000mAh", "Electronics", 34.99, 4.1, false),
    product("P009", "Smart LED Desk Lamp", "Lighting", 49.99, 4.6, true),
    product("P010", "2m Braided USB-C Cable (3-pack)", "Electronics", 14.99, 4.0, true),
];

/// Order id to order. Covers every lifecycle state once.
pub static ORDERS: LazyLock<BTreeMap<&'static str, OrderRecord>> = LazyLock::new(|| {
    BTreeMap::from([
        (
            "ORD-1001",
            OrderRecord {
                status: OrderStatus::Delivered,
                placed: date(2026, 2, 10),
                estimated_delivery: Some(date(2026, 2, 14)),
                delivered: Some(date(2026, 2, 13)),
                carrier: Some("FedEx"),
                tracking: Some("FX123456789"),
            },
        ),
        (
            "ORD-1002",
            OrderRecord {
                status: OrderStatus::InTransit,
                placed: date(2026, 2, 15),
                estimated_delivery: Some(date(2026, 2, 20)),
                delivered: None,
                carrier: Some("UPS"),
                tracking: Some("1Z9999W99999999999"),
            },
        ),
        (
            "ORD-1003",
            OrderRecord {
                status: OrderStatus::Processing,
                placed: date(2026, 2, 18),
                estimated_delivery: Some(date(2026, 2, 24)),
                delivered: None,
                carrier: None,
                tracking: None,
            },
        ),
        (
            "ORD-1004",
            OrderRecord {
                status: OrderStatus::Shipped,
                placed: date(2026, 2, 17),
                estimated_delivery: Some(date(2026, 2, 22)),
                delivered: None,
                carrier: Some("USPS"),
                tracking: Some("9400111899223445401090"),
            },
        ),
        (
            "ORD-1005",
            OrderRecord {
                status: OrderStatus::Cancelled,
                placed: date(2026, 2, 12),
                estimated_delivery: None,
                delivered: None,
                carrier: None,
                tracking: None,
            },
        ),
    ])
});

pub fn lookup_weather(city: &str) -> Option<&'static WeatherRecord> {
    WEATHER
        .iter()
        .find(|(name, _)| *name == city)
        .map(|(_, record)| record)
}

pub fn lookup_order(order_id: &str) -> Option<&'static OrderRecord> {
    ORDERS.get(order_id)
}

/// First and last order ids, used in not-found messages.
pub fn order_id_range() -> (&'static str, &'static str) {
    let first = ORDERS.keys().next().copied().unwrap_or_default();
    let last = ORDERS.keys().next_back().copied().unwrap_or_default();
    (first, last)
}

const fn weather(
    temperature_c: i32,
    condition: &'static str,
    humidity_pct: u8,
    wind_kmh: u32,
) -> WeatherRecord {
    WeatherRecord {
        temperature_c,
        condition,
        humidity_pct,
        wind_kmh,
    }
}

const fn product(
    id: &'static str,
    name: &'static str,
    category: &'static str,
    price_usd: f64,
    rating: f64,
    in_stock: bool,
) -> ProductRecord {
    ProductRecord {
        id,
        name,
        category,
        price_usd,
        rating,
        in_stock,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("static order dates are valid calendar dates")
}
