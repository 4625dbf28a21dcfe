// models/package.rs
use serde::{Deserialize, Serialize};

/// A voucher tier as rendered by the captive-portal frontend. `value` is the
/// price in UGX and doubles as the amount charged on initiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherPackage {
    pub label: String,
    pub value: u32,
    pub price: String,
    pub duration: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
}

impl VoucherPackage {
    pub fn default_catalog() -> Vec<VoucherPackage> {
        const COLOR: &str = "from-green-500 to-emerald-600";

        let tier = |label: &str, value: u32, duration: &str| VoucherPackage {
            label: label.to_string(),
            value,
            price: format!("UGX {}", value),
            duration: duration.to_string(),
            color: COLOR.to_string(),
            speed: None,
        };

        vec![
            tier("24 Hours", 1000, "Full Day"),
            tier("7 Days", 6000, "Full Week"),
            tier("12 Hours", 500, "Half Day"),
            tier("30 Days", 25000, "Full Month"),
            tier("90 Days", 70000, "Full Quarter"),
            tier("180 Days", 120000, "Full Half Year"),
        ]
    }
}
