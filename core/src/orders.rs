use serde::Serialize;
use serde_json::{Map, Value};

use crate::args::arg_str;
use crate::datasets::{OrderRecord, lookup_order, order_id_range};
use crate::tool::{Tool, ToolError, ToolOutput, ToolProperty};
use crate::weather::MOCK_SOURCE;

pub const NOT_FOUND_STATUS: &str = "Not Found";

static PROPERTIES: [ToolProperty; 1] = [ToolProperty::string(
    "order_id",
    "The order ID to look up (e.g. ORD-1001).",
)];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderFound {
    pub order_id: String,
    #[serde(flatten)]
    pub order: OrderRecord,
    pub source: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderNotFound {
    pub order_id: String,
    pub status: &'static str,
    pub message: String,
    pub source: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OrderLookup {
    Found(OrderFound),
    NotFound(OrderNotFound),
}

pub fn get_order_status(order_id: &str) -> OrderLookup {
    let order_id = order_id.trim().to_uppercase();
    match lookup_order(&order_id) {
        Some(order) => OrderLookup::Found(OrderFound {
            order_id,
            order: order.clone(),
            source: MOCK_SOURCE,
        }),
        None => {
            let (first, last) = order_id_range();
            let message = format!(
                "No order found with ID '{order_id}'. Valid examples: {first} through {last}."
            );
            OrderLookup::NotFound(OrderNotFound {
                order_id,
                status: NOT_FOUND_STATUS,
                message,
                source: MOCK_SOURCE,
            })
        }
    }
}

pub struct GetOrderStatus;

impl Tool for GetOrderStatus {
    fn name(&self) -> &'static str {
        "get_order_status"
    }

    fn description(&self) -> &'static str {
        "Look up the status and tracking information for an order by its ID. Uses mock data."
    }

    fn properties(&self) -> &'static [ToolProperty] {
        &PROPERTIES
    }

    fn invoke(&self, args: &Map<String, Value>) -> Result<ToolOutput, ToolError> {
        tracing::info!("get_order_status triggered");
        let order_id = arg_str(args, "order_id")?;
        ToolOutput::json(&get_order_status(order_id))
    }
}
