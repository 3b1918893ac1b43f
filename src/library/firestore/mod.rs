pub mod games;
pub mod users;
pub mod wishlist;

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::{
    api::FirestoreApi,
    documents::{GameRecord, WishlistEntry},
    traits::{CatalogStore, WishlistSnapshot, WishlistStore},
    Status,
};

/// Firestore-backed implementation of the store seams, delegating to the
/// per-collection accessors.
pub struct FirestoreStore {
    firestore: Arc<FirestoreApi>,
}

impl FirestoreStore {
    pub fn new(firestore: Arc<FirestoreApi>) -> Self {
        FirestoreStore { firestore }
    }
}

#[async_trait]
impl CatalogStore for FirestoreStore {
    async fn list_games(&self) -> Result<Vec<GameRecord>, Status> {
        games::list(&self.firestore).await
    }

    async fn read_game(&self, game_id: &str) -> Result<GameRecord, Status> {
        games::read(&self.firestore, game_id).await
    }
}

#[async_trait]
impl WishlistStore for FirestoreStore {
    async fn list(&self, user_id: &str) -> Result<Vec<WishlistEntry>, Status> {
        wishlist::list(&self.firestore, user_id).await
    }

    async fn create(&self, user_id: &str, entry: WishlistEntry) -> Result<String, Status> {
        wishlist::add(&self.firestore, user_id, entry).await
    }

    async fn delete(&self, user_id: &str, doc_id: &str) -> Result<(), Status> {
        wishlist::remove(&self.firestore, user_id, doc_id).await
    }

    async fn find_by_game(
        &self,
        user_id: &str,
        game_id: &str,
    ) -> Result<Option<WishlistEntry>, Status> {
        wishlist::find_by_game(&self.firestore, user_id, game_id).await
    }

    async fn watch(
        &self,
        user_id: &str,
    ) -> Result<BoxStream<'static, WishlistSnapshot>, Status> {
        wishlist::watch(Arc::clone(&self.firestore), user_id).await
    }
}
