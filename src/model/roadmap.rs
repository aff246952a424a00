use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{product_scoped, Model};

/// A published roadmap version and where to find it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub product_id: String,
    pub version: String,
    pub link: String,
    pub created_on: NaiveDate,
}

impl Model for RoadmapEntry {
    const TABLE: &'static str = "roadmap";
    const NATURAL_KEY: &'static [&'static str] = &["product_id", "version"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Free-form detail text recorded against a roadmap version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub product_id: String,
    pub version: String,
    pub detail: String,
    pub created_on: NaiveDate,
}

impl Model for RoadmapDetail {
    const TABLE: &'static str = "roadmap_details";
    const NATURAL_KEY: &'static [&'static str] = &["product_id", "version"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

product_scoped!(RoadmapEntry, RoadmapDetail);
