use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::{
    documents::{GameRecord, WishlistEntry},
    traits::WishlistStore,
    Status,
};

use super::{Notification, Notifier, UserSession};

pub type SnapshotCallback = Arc<dyn Fn(Vec<WishlistEntry>) + Send + Sync>;
pub type ErrorCallback = Arc<dyn Fn(Status) + Send + Sync>;

/// Facade over the user's wishlist subcollection.
///
/// Every operation resolves the uid from the session first; without a
/// signed-in identity nothing reaches the store and a single
/// `Unauthenticated` notification is emitted. Failures are both returned as
/// `Status` and surfaced on the notification channel.
pub struct WishlistRepository<S: WishlistStore> {
    store: Arc<S>,
    session: UserSession,
    notifier: Arc<dyn Notifier>,
}

impl<S: WishlistStore + 'static> WishlistRepository<S> {
    pub fn new(store: Arc<S>, session: UserSession, notifier: Arc<dyn Notifier>) -> Self {
        WishlistRepository {
            store,
            session,
            notifier,
        }
    }

    /// Opens a live query over the wishlist ordered by creation time
    /// descending. `on_data` receives the full snapshot on initial load and
    /// after every change; `on_error` receives query failures with state
    /// left unchanged.
    ///
    /// While signed out this delivers a single empty snapshot and the
    /// returned handle is already cancelled.
    pub async fn subscribe(
        &self,
        on_data: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> WishlistSubscription {
        let user_id = match self.session.uid() {
            Some(user_id) => user_id,
            None => {
                self.report_unauthenticated("subscribe");
                on_data(vec![]);
                return WishlistSubscription::cancelled();
            }
        };

        let mut stream = match self.store.watch(&user_id).await {
            Ok(stream) => stream,
            Err(status) => {
                warn!("wishlist subscribe failed: {status}");
                on_error(status);
                return WishlistSubscription::cancelled();
            }
        };

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let handle = tokio::spawn(async move {
            while let Some(snapshot) = stream.next().await {
                if flag.load(Ordering::SeqCst) {
                    break;
                }
                match snapshot {
                    Ok(entries) => on_data(entries),
                    Err(status) => on_error(status),
                }
            }
        });

        WishlistSubscription {
            cancelled,
            handle: Some(handle),
        }
    }

    /// Live boolean for a single game's membership, derived from the same
    /// query as `subscribe`. Keyed by the `gameId` field, not the storage
    /// key.
    pub async fn contains_game_live(
        &self,
        game_id: &str,
        on_change: Arc<dyn Fn(bool) + Send + Sync>,
        on_error: ErrorCallback,
    ) -> WishlistSubscription {
        let game_id = game_id.to_owned();
        self.subscribe(
            Arc::new(move |entries| {
                on_change(entries.iter().any(|e| e.game_id == game_id));
            }),
            on_error,
        )
        .await
    }

    #[instrument(
        level = "trace",
        skip(self, game),
        fields(game_id = %game.id),
    )]
    pub async fn add(&self, game: &GameRecord) -> Result<String, Status> {
        let user_id = match self.session.uid() {
            Some(user_id) => user_id,
            None => {
                self.report_unauthenticated("add");
                return Err(Status::unauthenticated("No user is signed in"));
            }
        };

        match self.store.create(&user_id, WishlistEntry::new(game)).await {
            Ok(doc_id) => {
                info!("'{}' added to wishlist", game.title);
                self.notifier
                    .notify(Notification::success(format!(
                        "{} added to wishlist",
                        game.title
                    )));
                Ok(doc_id)
            }
            Err(status) => {
                warn!("failed to add '{}' to wishlist: {status}", game.title);
                self.notifier.notify(
                    Notification::error("Error adding to wishlist")
                        .with_subtitle(format!("Could not add {}.", game.title)),
                );
                Err(status)
            }
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub async fn remove(&self, doc_id: &str) -> Result<(), Status> {
        let user_id = match self.session.uid() {
            Some(user_id) => user_id,
            None => {
                self.report_unauthenticated("remove");
                return Err(Status::unauthenticated("No user is signed in"));
            }
        };

        match self.store.delete(&user_id, doc_id).await {
            Ok(()) => {
                info!("wishlist entry '{doc_id}' removed");
                self.notifier
                    .notify(Notification::success("Removed from Wishlist"));
                Ok(())
            }
            Err(status) => {
                warn!("failed to remove wishlist entry '{doc_id}': {status}");
                self.notifier
                    .notify(Notification::error("Error removing from Wishlist"));
                Err(status)
            }
        }
    }

    /// One-shot membership check, resolved by a query on the `gameId` field.
    #[instrument(level = "trace", skip(self))]
    pub async fn contains_game(&self, game_id: &str) -> Result<bool, Status> {
        let user_id = match self.session.uid() {
            Some(user_id) => user_id,
            None => {
                self.report_unauthenticated("contains_game");
                return Err(Status::unauthenticated("No user is signed in"));
            }
        };

        Ok(self.store.find_by_game(&user_id, game_id).await?.is_some())
    }

    fn report_unauthenticated(&self, operation: &str) {
        warn!("wishlist {operation} requested without a signed-in user");
        self.notifier
            .notify(Notification::error("No user is signed in"));
    }
}

/// Cancellation handle for a live wishlist query.
///
/// `cancel` is idempotent; after it returns no further callbacks fire.
/// Dropping the handle cancels as well.
pub struct WishlistSubscription {
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl WishlistSubscription {
    fn cancelled() -> Self {
        WishlistSubscription {
            cancelled: Arc::new(AtomicBool::new(true)),
            handle: None,
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for WishlistSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::testing::{wait_until, MemoryStore, RecordingNotifier, SnapshotLog};
    use crate::library::NotifyKind;

    fn game(id: &str, title: &str) -> GameRecord {
        GameRecord {
            id: id.to_owned(),
            title: title.to_owned(),
            ..Default::default()
        }
    }

    fn repository(
        store: &Arc<MemoryStore>,
        session: UserSession,
    ) -> (WishlistRepository<MemoryStore>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        (
            WishlistRepository::new(
                Arc::clone(store),
                session,
                Arc::clone(&notifier) as Arc<dyn Notifier>,
            ),
            notifier,
        )
    }

    #[tokio::test]
    async fn subscribe_delivers_initial_snapshot() {
        let store = Arc::new(MemoryStore::default());
        let (repo, _) = repository(&store, UserSession::signed_in("u1"));
        repo.add(&game("g1", "Foo")).await.unwrap();

        let log = SnapshotLog::default();
        let _sub = repo.subscribe(log.on_data(), log.on_error()).await;

        assert!(wait_until(|| log.snapshots().len() == 1).await);
        let titles: Vec<String> = log.snapshots()[0].iter().map(|e| e.title.clone()).collect();
        assert_eq!(titles, vec!["Foo"]);
    }

    #[tokio::test]
    async fn subscribe_delivers_snapshot_per_change() {
        let store = Arc::new(MemoryStore::default());
        let (repo, _) = repository(&store, UserSession::signed_in("u1"));

        let log = SnapshotLog::default();
        let _sub = repo.subscribe(log.on_data(), log.on_error()).await;
        assert!(wait_until(|| log.snapshots().len() == 1).await);
        assert!(log.snapshots()[0].is_empty());

        let doc_id = repo.add(&game("g1", "Foo")).await.unwrap();
        assert!(wait_until(|| log.snapshots().len() == 2).await);
        assert_eq!(log.snapshots()[1][0].doc_id, doc_id);

        repo.remove(&doc_id).await.unwrap();
        assert!(wait_until(|| log.snapshots().len() == 3).await);
        assert!(log.snapshots()[2].is_empty());
    }

    #[tokio::test]
    async fn cancel_is_idempotent_and_stops_callbacks() {
        let store = Arc::new(MemoryStore::default());
        let (repo, _) = repository(&store, UserSession::signed_in("u1"));

        let log = SnapshotLog::default();
        let mut sub = repo.subscribe(log.on_data(), log.on_error()).await;
        assert!(wait_until(|| log.snapshots().len() == 1).await);

        sub.cancel();
        sub.cancel();
        assert!(sub.is_cancelled());

        repo.add(&game("g1", "Foo")).await.unwrap();
        assert!(!wait_until(|| log.snapshots().len() > 1).await);
    }

    #[tokio::test]
    async fn cancel_releases_the_store_watcher() {
        let store = Arc::new(MemoryStore::default());
        let (repo, _) = repository(&store, UserSession::signed_in("u1"));

        let log = SnapshotLog::default();
        let mut sub = repo.subscribe(log.on_data(), log.on_error()).await;
        assert!(wait_until(|| store.watcher_count() == 1).await);

        // Cancellation must tear down the watch stream itself, not just
        // silence the callbacks.
        sub.cancel();
        assert!(wait_until(|| store.watcher_count() == 0).await);
    }

    #[tokio::test]
    async fn subscribe_reports_query_failures() {
        let store = Arc::new(MemoryStore::default());
        store.set_fail_reads(true);
        let (repo, _) = repository(&store, UserSession::signed_in("u1"));

        let log = SnapshotLog::default();
        let _sub = repo.subscribe(log.on_data(), log.on_error()).await;

        assert!(wait_until(|| log.errors() == 1).await);
        assert!(log.snapshots().is_empty());
    }

    #[tokio::test]
    async fn unauthenticated_operations_skip_the_store() {
        let store = Arc::new(MemoryStore::default());
        let (repo, notifier) = repository(&store, UserSession::signed_out());

        assert!(matches!(
            repo.add(&game("g1", "Foo")).await,
            Err(Status::Unauthenticated(_))
        ));
        assert_eq!(store.write_attempts(), 0);
        assert_eq!(notifier.errors(), 1);

        assert!(matches!(
            repo.remove("w0").await,
            Err(Status::Unauthenticated(_))
        ));
        assert_eq!(notifier.errors(), 2);

        assert!(matches!(
            repo.contains_game("g1").await,
            Err(Status::Unauthenticated(_))
        ));
        assert_eq!(notifier.errors(), 3);
        assert_eq!(store.write_attempts(), 0);
    }

    #[tokio::test]
    async fn unauthenticated_subscribe_reports_empty_once() {
        let store = Arc::new(MemoryStore::default());
        let (repo, notifier) = repository(&store, UserSession::signed_out());

        let log = SnapshotLog::default();
        let sub = repo.subscribe(log.on_data(), log.on_error()).await;

        assert!(sub.is_cancelled());
        assert_eq!(log.snapshots().len(), 1);
        assert!(log.snapshots()[0].is_empty());
        assert_eq!(notifier.errors(), 1);
    }

    #[tokio::test]
    async fn add_reports_store_failure() {
        let store = Arc::new(MemoryStore::default());
        store.set_fail_writes(true);
        let (repo, notifier) = repository(&store, UserSession::signed_in("u1"));

        assert!(matches!(
            repo.add(&game("g1", "Foo")).await,
            Err(Status::Internal(_))
        ));
        let notifications = notifier.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotifyKind::Error);
        assert!(store.list("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_of_missing_entry_is_success() {
        let store = Arc::new(MemoryStore::default());
        let (repo, _) = repository(&store, UserSession::signed_in("u1"));

        // The store treats deleting an unknown key as already done.
        assert!(repo.remove("never-existed").await.is_ok());
    }

    #[tokio::test]
    async fn contains_game_uses_game_id_not_storage_key() {
        let store = Arc::new(MemoryStore::default());
        let (repo, _) = repository(&store, UserSession::signed_in("u1"));

        let doc_id = repo.add(&game("g1", "Foo")).await.unwrap();
        assert_ne!(doc_id, "g1");

        assert!(repo.contains_game("g1").await.unwrap());
        assert!(!repo.contains_game(&doc_id).await.unwrap());
    }

    #[tokio::test]
    async fn contains_game_live_tracks_membership() {
        let store = Arc::new(MemoryStore::default());
        let (repo, _) = repository(&store, UserSession::signed_in("u1"));

        let log = SnapshotLog::default();
        let states = Arc::new(std::sync::Mutex::new(Vec::<bool>::new()));
        let states_clone = Arc::clone(&states);
        let _sub = repo
            .contains_game_live(
                "g1",
                Arc::new(move |contained| states_clone.lock().unwrap().push(contained)),
                log.on_error(),
            )
            .await;

        assert!(wait_until(|| states.lock().unwrap().len() == 1).await);
        assert_eq!(states.lock().unwrap().last(), Some(&false));

        let doc_id = repo.add(&game("g1", "Foo")).await.unwrap();
        assert!(wait_until(|| states.lock().unwrap().last() == Some(&true)).await);

        repo.remove(&doc_id).await.unwrap();
        assert!(wait_until(|| states.lock().unwrap().last() == Some(&false)).await);
    }
}
