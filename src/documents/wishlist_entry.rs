use serde::{Deserialize, Serialize};
use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};

use super::GameRecord;

/// Document type under 'users/{user_id}/wishlist/{doc_id}' holding a catalog
/// game the user marked as desired.
///
/// `doc_id` is the storage key assigned by the store when the entry is
/// created. It is distinct from `game_id` and is the only valid key for
/// deletion; it is never serialized into the document body.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    #[serde(default, alias = "_firestore_id", skip_serializing)]
    pub doc_id: String,

    pub game_id: String,
    pub title: String,
    pub cover_url: String,

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
    pub created_at: u64,
}

impl WishlistEntry {
    pub fn new(game: &GameRecord) -> Self {
        WishlistEntry {
            doc_id: String::default(),
            game_id: game.id.clone(),
            title: game.title.clone(),
            cover_url: game.cover_url.clone(),
            genres: game.genres.clone(),
            platforms: game.platforms.clone(),
            rating_avg: game.rating_avg,

            created_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_secs(),
        }
    }
}

impl fmt::Display for WishlistEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WishlistEntry({}): game={} '{}'",
            &self.doc_id, &self.game_id, &self.title
        )
    }
}
