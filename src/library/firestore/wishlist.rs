use std::sync::Arc;

use firestore::{
    FirestoreListenEvent, FirestoreListenerTarget, FirestoreMemListenStateStorage,
    FirestoreQueryDirection,
};
use futures::{
    stream::{self, BoxStream},
    StreamExt,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{error, instrument, warn};
use uuid::Uuid;

use crate::{
    api::FirestoreApi, documents::WishlistEntry, traits::WishlistSnapshot, Status,
};

/// Returns the user's wishlist ordered by creation time descending.
#[instrument(name = "wishlist::list", level = "trace", skip(firestore, user_id))]
pub async fn list(firestore: &FirestoreApi, user_id: &str) -> Result<Vec<WishlistEntry>, Status> {
    let parent_path = firestore.db().parent_path(USERS, user_id)?;

    let doc_stream: BoxStream<WishlistEntry> = firestore
        .db()
        .fluent()
        .select()
        .from(WISHLIST)
        .parent(&parent_path)
        .order_by([(
            CREATED_AT.to_owned(),
            FirestoreQueryDirection::Descending,
        )])
        .obj()
        .stream_query()
        .await?;

    Ok(doc_stream.collect().await)
}

/// Creates the entry under a generated document id and returns the id. No
/// duplicate guard; repeat adds for the same game create separate documents.
#[instrument(
    name = "wishlist::add",
    level = "trace",
    skip(firestore, user_id, entry),
    fields(game_id = %entry.game_id),
)]
pub async fn add(
    firestore: &FirestoreApi,
    user_id: &str,
    entry: WishlistEntry,
) -> Result<String, Status> {
    let parent_path = firestore.db().parent_path(USERS, user_id)?;
    let doc_id = Uuid::new_v4().simple().to_string();

    firestore
        .db()
        .fluent()
        .update()
        .in_col(WISHLIST)
        .document_id(&doc_id)
        .parent(&parent_path)
        .object(&entry)
        .execute::<()>()
        .await?;

    Ok(doc_id)
}

/// Deletes the entry by its storage key. The store treats deleting an id
/// that no longer exists as already done.
#[instrument(name = "wishlist::remove", level = "trace", skip(firestore, user_id))]
pub async fn remove(firestore: &FirestoreApi, user_id: &str, doc_id: &str) -> Result<(), Status> {
    let parent_path = firestore.db().parent_path(USERS, user_id)?;

    firestore
        .db()
        .fluent()
        .delete()
        .from(WISHLIST)
        .parent(&parent_path)
        .document_id(doc_id)
        .execute()
        .await?;
    Ok(())
}

/// Looks up an entry by the `gameId` field. The storage key is autogenerated
/// and unrelated to the game id, so a query is the only correct lookup.
#[instrument(
    name = "wishlist::find_by_game",
    level = "trace",
    skip(firestore, user_id)
)]
pub async fn find_by_game(
    firestore: &FirestoreApi,
    user_id: &str,
    game_id: &str,
) -> Result<Option<WishlistEntry>, Status> {
    let parent_path = firestore.db().parent_path(USERS, user_id)?;

    let matches: BoxStream<WishlistEntry> = firestore
        .db()
        .fluent()
        .select()
        .from(WISHLIST)
        .parent(&parent_path)
        .filter(|q| q.for_all([q.field(GAME_ID.to_owned()).eq(game_id.to_owned())]))
        .obj()
        .stream_query()
        .await?;

    let entries: Vec<WishlistEntry> = matches.collect().await;
    Ok(entries.into_iter().next())
}

/// Opens a listener on the wishlist subcollection and yields the full
/// ordered snapshot on open and after every change event. The listener is
/// torn down when the returned stream is dropped.
#[instrument(name = "wishlist::watch", level = "trace", skip(firestore, user_id))]
pub async fn watch(
    firestore: Arc<FirestoreApi>,
    user_id: &str,
) -> Result<BoxStream<'static, WishlistSnapshot>, Status> {
    let parent_path = firestore.db().parent_path(USERS, user_id)?;

    let mut listener = firestore
        .db()
        .create_listener(FirestoreMemListenStateStorage::new())
        .await?;

    firestore
        .db()
        .fluent()
        .select()
        .from(WISHLIST)
        .parent(&parent_path)
        .listen()
        .add_target(FirestoreListenerTarget::new(WISHLIST_TARGET), &mut listener)?;

    // Initial load; the listener only reports subsequent changes.
    let (tx, rx) = mpsc::unbounded_channel::<WishlistSnapshot>();
    let _ = tx.send(list(&firestore, user_id).await);

    let user_id = user_id.to_owned();
    listener
        .start(move |event| {
            let tx = tx.clone();
            let firestore = Arc::clone(&firestore);
            let user_id = user_id.clone();
            async move {
                match event {
                    FirestoreListenEvent::DocumentChange(_)
                    | FirestoreListenEvent::DocumentDelete(_) => {
                        if tx.send(list(&firestore, &user_id).await).is_err() {
                            error!("wishlist watch receiver dropped");
                        }
                    }
                    _ => {}
                }
                Ok(())
            }
        })
        .await?;

    // The listener keeps its grpc stream and polling task alive until
    // `shutdown` is called; dropping it is not enough. The guard sender
    // moves into the stream state, so dropping the stream wakes the
    // shutdown task below.
    let (guard, released) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let _ = released.await;
        if let Err(err) = listener.shutdown().await {
            warn!("wishlist listener shutdown failed: {err}");
        }
    });

    let stream = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        rx.recv().await.map(|snapshot| (snapshot, (rx, guard)))
    });
    Ok(Box::pin(stream))
}

const USERS: &str = "users";
const WISHLIST: &str = "wishlist";
const GAME_ID: &str = "gameId";
const CREATED_AT: &str = "createdAt";
const WISHLIST_TARGET: u32 = 17;
