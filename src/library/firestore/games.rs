use firestore::FirestoreQueryDirection;
use futures::{stream::BoxStream, StreamExt};
use tracing::instrument;

use crate::{api::FirestoreApi, documents::GameRecord, Status};

/// Returns the full catalog ordered by average rating descending.
#[instrument(name = "games::list", level = "trace", skip(firestore))]
pub async fn list(firestore: &FirestoreApi) -> Result<Vec<GameRecord>, Status> {
    let doc_stream: BoxStream<GameRecord> = firestore
        .db()
        .fluent()
        .select()
        .from(GAMES)
        .order_by([(
            RATING_AVG.to_owned(),
            FirestoreQueryDirection::Descending,
        )])
        .obj()
        .stream_query()
        .await?;

    Ok(doc_stream.collect().await)
}

#[instrument(name = "games::read", level = "trace", skip(firestore))]
pub async fn read(firestore: &FirestoreApi, doc_id: &str) -> Result<GameRecord, Status> {
    let doc = firestore
        .db()
        .fluent()
        .select()
        .by_id_in(GAMES)
        .obj()
        .one(doc_id)
        .await?;

    match doc {
        Some(doc) => Ok(doc),
        None => Err(Status::not_found(format!(
            "Firestore document '{GAMES}/{doc_id}' was not found"
        ))),
    }
}

#[instrument(name = "games::write", level = "trace", skip(firestore, game))]
pub async fn write(firestore: &FirestoreApi, game: &GameRecord) -> Result<(), Status> {
    if game.id.is_empty() {
        return Err(Status::invalid_argument(
            "catalog documents require a non-empty id",
        ));
    }

    firestore
        .db()
        .fluent()
        .update()
        .in_col(GAMES)
        .document_id(&game.id)
        .object(game)
        .execute::<()>()
        .await?;
    Ok(())
}

#[instrument(name = "games::delete", level = "trace", skip(firestore))]
pub async fn delete(firestore: &FirestoreApi, doc_id: &str) -> Result<(), Status> {
    firestore
        .db()
        .fluent()
        .delete()
        .from(GAMES)
        .document_id(doc_id)
        .execute()
        .await?;
    Ok(())
}

const GAMES: &str = "games";
const RATING_AVG: &str = "ratingAvg";
