use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tracing::instrument;

use crate::{
    documents::{GameRecord, WishlistEntry},
    traits::{CatalogStore, WishlistStore},
    Status,
};

use super::{ErrorCallback, WishlistRepository, WishlistSubscription};

/// Genre/platform filter. `Only` matches by case-insensitive equality against
/// any of a game's values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Only(String),
}

impl Filter {
    fn matches(&self, values: &[String]) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => {
                let wanted = wanted.to_lowercase();
                values.iter().any(|value| value.to_lowercase() == wanted)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistToggle {
    Added(String),
    Removed(String),
}

/// Composes the catalog with the live wishlist membership into renderable
/// rows with search and filtering.
///
/// The membership map (game id -> storage key) is derived wholesale from
/// every wishlist snapshot and replaced atomically; it is never patched
/// incrementally. It lags the remote state by delivery latency, so a toggle
/// is not reflected until the next snapshot arrives.
pub struct GameListViewModel<S: WishlistStore> {
    repository: Arc<WishlistRepository<S>>,
    games: Vec<GameRecord>,
    membership: Arc<Mutex<HashMap<String, String>>>,
    search: String,
    genre_filter: Filter,
    platform_filter: Filter,
    subscription: Option<WishlistSubscription>,
}

impl<S: WishlistStore + 'static> GameListViewModel<S> {
    pub fn new(repository: Arc<WishlistRepository<S>>) -> Self {
        GameListViewModel {
            repository,
            games: vec![],
            membership: Arc::new(Mutex::new(HashMap::new())),
            search: String::new(),
            genre_filter: Filter::All,
            platform_filter: Filter::All,
            subscription: None,
        }
    }

    /// Loads the catalog snapshot. Incoming order (rating descending,
    /// supplied by the store) is preserved.
    #[instrument(level = "trace", skip(self, catalog))]
    pub async fn load_catalog(&mut self, catalog: &dyn CatalogStore) -> Result<(), Status> {
        self.games = catalog.list_games().await?;
        Ok(())
    }

    pub fn set_games(&mut self, games: Vec<GameRecord>) {
        self.games = games;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn set_genre_filter(&mut self, filter: Filter) {
        self.genre_filter = filter;
    }

    pub fn set_platform_filter(&mut self, filter: Filter) {
        self.platform_filter = filter;
    }

    /// Games matching the search term AND the genre filter AND the platform
    /// filter, in catalog order.
    pub fn visible_games(&self) -> Vec<&GameRecord> {
        let needle = self.search.trim().to_lowercase();
        self.games
            .iter()
            .filter(|game| {
                matches_search(game, &needle)
                    && self.genre_filter.matches(&game.genres)
                    && self.platform_filter.matches(&game.platforms)
            })
            .collect()
    }

    pub fn is_wishlisted(&self, game_id: &str) -> bool {
        self.membership.lock().unwrap().contains_key(game_id)
    }

    pub fn wishlist_doc_id(&self, game_id: &str) -> Option<String> {
        self.membership.lock().unwrap().get(game_id).cloned()
    }

    /// Subscribes to the wishlist and keeps the membership map in sync.
    /// Replaces any previous subscription.
    pub async fn start(&mut self, on_error: ErrorCallback) {
        self.stop();

        let membership = Arc::clone(&self.membership);
        let subscription = self
            .repository
            .subscribe(
                Arc::new(move |entries| {
                    *membership.lock().unwrap() = rebuild_membership(&entries);
                }),
                on_error,
            )
            .await;
        self.subscription = Some(subscription);
    }

    /// Tears down the live query. Idempotent.
    pub fn stop(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }

    /// Removes the game when it is wishlisted (by its mapped storage key),
    /// adds it otherwise. The membership map does not change until the next
    /// snapshot; rapid repeat toggles are unsynchronized by design and may
    /// create duplicate entries that the next snapshot rebuild absorbs.
    #[instrument(
        level = "trace",
        skip(self, game),
        fields(game_id = %game.id),
    )]
    pub async fn toggle_wishlist(&self, game: &GameRecord) -> Result<WishlistToggle, Status> {
        match self.wishlist_doc_id(&game.id) {
            Some(doc_id) => {
                self.repository.remove(&doc_id).await?;
                Ok(WishlistToggle::Removed(doc_id))
            }
            None => {
                let doc_id = self.repository.add(game).await?;
                Ok(WishlistToggle::Added(doc_id))
            }
        }
    }
}

/// A key is present iff an entry with that game id exists in the snapshot.
fn rebuild_membership(entries: &[WishlistEntry]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|entry| (entry.game_id.clone(), entry.doc_id.clone()))
        .collect()
}

fn matches_search(game: &GameRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    game.title.to_lowercase().contains(needle)
        || game.genres.iter().any(|g| g.to_lowercase().contains(needle))
        || game
            .platforms
            .iter()
            .any(|p| p.to_lowercase().contains(needle))
}
