use serde::{Deserialize, Serialize};

use crate::Category;

/// Persisted route metadata document.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TrackMeta {
    #[serde(default)]
    pub departure: String,
    #[serde(default)]
    pub arrival: String,
    #[serde(default)]
    pub is_time_trial: bool,
    #[serde(default)]
    pub marks: Vec<MarkRecord>,
}

/// Plain mark record as stored in a metadata document.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub position: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_position: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub souvenir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_position: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl MarkRecord {
    pub fn new(kind: impl Into<String>, name: impl Into<String>, position: f64) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            position,
            end_position: None,
            souvenir: None,
            start_position: None,
            category: None,
        }
    }
}
