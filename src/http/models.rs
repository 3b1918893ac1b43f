use crate::documents;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct WishlistOp {
    pub user_id: String,

    /// Catalog game to add to the user's wishlist, if one is provided.
    #[serde(default)]
    pub add_game: Option<documents::GameRecord>,

    /// Storage key of the wishlist entry to remove, if one is provided.
    #[serde(default)]
    pub remove_entry: Option<String>,
}

impl std::fmt::Display for WishlistOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_id)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ProfileOp {
    pub user_id: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

impl std::fmt::Display for ProfileOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_id)
    }
}
