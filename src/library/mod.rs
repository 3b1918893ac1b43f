pub mod firestore;

mod notify;
mod repository;
mod session;
mod view_model;

pub use firestore::FirestoreStore;
pub use notify::{LogNotifier, Notification, Notifier, NotifyKind};
pub use repository::{ErrorCallback, SnapshotCallback, WishlistRepository, WishlistSubscription};
pub use session::UserSession;
pub use view_model::{Filter, GameListViewModel, WishlistToggle};

#[cfg(test)]
pub(crate) mod testing;
