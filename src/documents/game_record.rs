use serde::{Deserialize, Serialize};
use std::fmt;

/// Document type under the top-level 'games' catalog collection. Catalog
/// entries are owned by the store and treated as read-only snapshots here.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// Document id of the catalog entry. Filled from the document path on
    /// reads, never stored in the document body.
    #[serde(default, alias = "_firestore_id", skip_serializing)]
    pub id: String,

    pub title: String,
    pub cover_url: String,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_avg: Option<f64>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<i64>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steam_app_id: Option<String>,
}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameRecord({}): '{}'", &self.id, &self.title)
    }
}
