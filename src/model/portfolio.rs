use serde::{Deserialize, Serialize};

use super::{product_scoped, Model};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Model for Portfolio {
    const TABLE: &'static str = "portfolios";
    const NATURAL_KEY: &'static [&'static str] = &["id"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub portfolio_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl Model for Product {
    const TABLE: &'static str = "products";
    const NATURAL_KEY: &'static [&'static str] = &["id"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// One monthly metric value for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub month: u32,
    #[serde(default)]
    pub year: i32,
    pub name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Model for Metric {
    const TABLE: &'static str = "monthly_metrics";
    const NATURAL_KEY: &'static [&'static str] = &["product_id", "year", "month", "name"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

product_scoped!(Metric);
