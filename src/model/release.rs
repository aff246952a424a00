//! Release goals, release plans and release notes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{product_scoped, Model};

/// A release goal for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub product_id: String,
    pub description: String,
    pub current_state: String,
    pub target_state: String,
    pub month: u32,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<String>,
}

impl Model for Goal {
    const TABLE: &'static str = "release_goals";
    const NATURAL_KEY: &'static [&'static str] = &["product_id", "year", "month", "description"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// A planned release item, optionally tied to a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub product_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    pub status: String,
    pub owner: String,
    pub month: u32,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<String>,
}

impl Model for Plan {
    const TABLE: &'static str = "release_plans";
    const NATURAL_KEY: &'static [&'static str] = &["product_id", "year", "month", "title"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Link to the release notes of one version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub product_id: String,
    pub release_notes_link: String,
    pub version: String,
    pub created_on: NaiveDate,
}

impl Model for Note {
    const TABLE: &'static str = "release_notes";
    const NATURAL_KEY: &'static [&'static str] = &["product_id", "version"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

product_scoped!(Goal, Plan, Note);
