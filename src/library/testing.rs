use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use tokio::sync::watch;

use crate::{
    documents::{GameRecord, WishlistEntry},
    traits::{CatalogStore, WishlistSnapshot, WishlistStore},
    Status,
};

use super::{ErrorCallback, Notification, Notifier, NotifyKind, SnapshotCallback};

/// In-memory stand-in for the remote document store. Wishlist mutations bump
/// a revision watch channel that drives `watch` streams, mirroring the live
/// query behavior of the real backend.
pub struct MemoryStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    games: Mutex<Vec<GameRecord>>,
    wishlists: Mutex<HashMap<String, Vec<WishlistEntry>>>,
    next_doc_id: AtomicU64,
    write_attempts: AtomicU64,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    revision: watch::Sender<u64>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        let (revision, _) = watch::channel(0);
        MemoryStore {
            inner: Arc::new(StoreInner {
                games: Mutex::new(vec![]),
                wishlists: Mutex::new(HashMap::new()),
                next_doc_id: AtomicU64::new(0),
                write_attempts: AtomicU64::new(0),
                fail_reads: AtomicBool::new(false),
                fail_writes: AtomicBool::new(false),
                revision,
            }),
        }
    }
}

impl MemoryStore {
    pub fn seed_games(&self, games: Vec<GameRecord>) {
        *self.inner.games.lock().unwrap() = games;
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn write_attempts(&self) -> u64 {
        self.inner.write_attempts.load(Ordering::SeqCst)
    }

    /// Number of live `watch` streams still holding their revision receiver.
    pub fn watcher_count(&self) -> usize {
        self.inner.revision.receiver_count()
    }
}

impl StoreInner {
    fn snapshot(&self, user_id: &str) -> WishlistSnapshot {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Status::internal("wishlist query rejected"));
        }

        let mut entries = self
            .wishlists
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default();
        entries.sort_by(|l, r| r.created_at.cmp(&l.created_at));
        Ok(entries)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_games(&self) -> Result<Vec<GameRecord>, Status> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(Status::internal("catalog query rejected"));
        }

        let mut games = self.inner.games.lock().unwrap().clone();
        games.sort_by(|l, r| {
            r.rating_avg
                .unwrap_or_default()
                .total_cmp(&l.rating_avg.unwrap_or_default())
        });
        Ok(games)
    }

    async fn read_game(&self, game_id: &str) -> Result<GameRecord, Status> {
        self.inner
            .games
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.id == game_id)
            .cloned()
            .ok_or_else(|| Status::not_found(format!("game '{game_id}' was not found")))
    }
}

#[async_trait]
impl WishlistStore for MemoryStore {
    async fn list(&self, user_id: &str) -> Result<Vec<WishlistEntry>, Status> {
        self.inner.snapshot(user_id)
    }

    async fn create(&self, user_id: &str, mut entry: WishlistEntry) -> Result<String, Status> {
        self.inner.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(Status::internal("wishlist write rejected"));
        }

        let doc_id = format!("w{}", self.inner.next_doc_id.fetch_add(1, Ordering::SeqCst));
        entry.doc_id = doc_id.clone();
        self.inner
            .wishlists
            .lock()
            .unwrap()
            .entry(user_id.to_owned())
            .or_default()
            .push(entry);
        self.inner.revision.send_modify(|r| *r += 1);
        Ok(doc_id)
    }

    async fn delete(&self, user_id: &str, doc_id: &str) -> Result<(), Status> {
        self.inner.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(Status::internal("wishlist delete rejected"));
        }

        let removed = {
            let mut wishlists = self.inner.wishlists.lock().unwrap();
            match wishlists.get_mut(user_id) {
                Some(entries) => {
                    let before = entries.len();
                    entries.retain(|e| e.doc_id != doc_id);
                    entries.len() != before
                }
                None => false,
            }
        };

        if removed {
            self.inner.revision.send_modify(|r| *r += 1);
        }
        // Deleting an unknown key is already done.
        Ok(())
    }

    async fn find_by_game(
        &self,
        user_id: &str,
        game_id: &str,
    ) -> Result<Option<WishlistEntry>, Status> {
        Ok(self
            .inner
            .snapshot(user_id)?
            .into_iter()
            .find(|e| e.game_id == game_id))
    }

    async fn watch(
        &self,
        user_id: &str,
    ) -> Result<BoxStream<'static, WishlistSnapshot>, Status> {
        let inner = Arc::clone(&self.inner);
        let user_id = user_id.to_owned();
        let receiver = inner.revision.subscribe();

        let stream = stream::unfold(
            (receiver, inner, user_id, true),
            |(mut receiver, inner, user_id, initial)| async move {
                if !initial && receiver.changed().await.is_err() {
                    return None;
                }
                let snapshot = inner.snapshot(&user_id);
                Some((snapshot, (receiver, inner, user_id, false)))
            },
        );
        Ok(Box::pin(stream))
    }
}

/// Records notifications for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn errors(&self) -> usize {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.kind == NotifyKind::Error)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

/// Records subscription callbacks for assertions.
#[derive(Default)]
pub struct SnapshotLog {
    snapshots: Arc<Mutex<Vec<Vec<WishlistEntry>>>>,
    errors: Arc<Mutex<Vec<Status>>>,
}

impl SnapshotLog {
    pub fn on_data(&self) -> SnapshotCallback {
        let snapshots = Arc::clone(&self.snapshots);
        Arc::new(move |entries| snapshots.lock().unwrap().push(entries))
    }

    pub fn on_error(&self) -> ErrorCallback {
        let errors = Arc::clone(&self.errors);
        Arc::new(move |status| errors.lock().unwrap().push(status))
    }

    pub fn snapshots(&self) -> Vec<Vec<WishlistEntry>> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn errors(&self) -> usize {
        self.errors.lock().unwrap().len()
    }
}

/// Polls `condition` until it holds or a short deadline passes.
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    false
}
