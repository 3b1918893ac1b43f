use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::{
    documents::{GameRecord, WishlistEntry},
    Status,
};

/// A full wishlist result delivered by a live query, ordered by creation time
/// descending.
pub type WishlistSnapshot = Result<Vec<WishlistEntry>, Status>;

/// Read access to the game catalog owned by the remote store.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Returns the catalog ordered by average rating descending.
    async fn list_games(&self) -> Result<Vec<GameRecord>, Status>;

    async fn read_game(&self, game_id: &str) -> Result<GameRecord, Status>;
}

/// Access to a user's wishlist subcollection.
///
/// The storage key (`WishlistEntry::doc_id`) is assigned by the store on
/// `create` and is the only valid key for `delete`. Lookups by game use a
/// query on the `gameId` field, never the storage key.
#[async_trait]
pub trait WishlistStore: Send + Sync {
    async fn list(&self, user_id: &str) -> Result<Vec<WishlistEntry>, Status>;

    /// Creates the entry with an autogenerated storage key and returns it.
    async fn create(&self, user_id: &str, entry: WishlistEntry) -> Result<String, Status>;

    /// Deletes by storage key. Deleting a key that no longer exists is not an
    /// error.
    async fn delete(&self, user_id: &str, doc_id: &str) -> Result<(), Status>;

    async fn find_by_game(
        &self,
        user_id: &str,
        game_id: &str,
    ) -> Result<Option<WishlistEntry>, Status>;

    /// Opens a live query that yields the full ordered wishlist immediately
    /// and again after every change, until the stream is dropped.
    async fn watch(&self, user_id: &str)
        -> Result<BoxStream<'static, WishlistSnapshot>, Status>;
}
