use crate::{
    api::FirestoreApi,
    documents::WishlistEntry,
    http::models,
    library::firestore::{games, users, wishlist},
};
use std::{convert::Infallible, sync::Arc};
use tracing::{info, instrument, warn};
use warp::http::StatusCode;

#[instrument(level = "trace")]
pub async fn welcome() -> Result<impl warp::Reply, Infallible> {
    info!(
        http_request.request_method = "GET",
        http_request.request_url = "/",
        labels.handler = "welcome",
        "welcome"
    );
    Ok("welcome")
}

#[instrument(level = "trace", skip(firestore))]
pub async fn get_games(firestore: Arc<FirestoreApi>) -> Result<Box<dyn warp::Reply>, Infallible> {
    match games::list(&firestore).await {
        Ok(games) => Ok(Box::new(warp::reply::json(&games))),
        Err(status) => {
            warn!("get_games: {status}");
            Ok(Box::new(StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

#[instrument(level = "trace", skip(firestore))]
pub async fn post_wishlist(
    op: models::WishlistOp,
    firestore: Arc<FirestoreApi>,
) -> Result<Box<dyn warp::Reply>, Infallible> {
    if let Some(game) = &op.add_game {
        match wishlist::add(&firestore, &op.user_id, WishlistEntry::new(game)).await {
            Ok(doc_id) => return Ok(Box::new(warp::reply::json(&doc_id))),
            Err(status) => {
                warn!("post_wishlist add: {status}");
                return Ok(Box::new(StatusCode::INTERNAL_SERVER_ERROR));
            }
        }
    }

    if let Some(doc_id) = &op.remove_entry {
        return match wishlist::remove(&firestore, &op.user_id, doc_id).await {
            Ok(()) => Ok(Box::new(StatusCode::OK)),
            Err(status) => {
                warn!("post_wishlist remove: {status}");
                Ok(Box::new(StatusCode::INTERNAL_SERVER_ERROR))
            }
        };
    }

    Ok(Box::new(StatusCode::BAD_REQUEST))
}

#[instrument(level = "trace", skip(firestore))]
pub async fn post_profile(
    op: models::ProfileOp,
    firestore: Arc<FirestoreApi>,
) -> Result<impl warp::Reply, Infallible> {
    if let Some(username) = &op.username {
        if let Err(status) = users::update_username(&firestore, &op.user_id, username).await {
            warn!("post_profile username: {status}");
            return Ok(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    if let Some(email) = &op.email {
        if let Err(status) = users::update_email(&firestore, &op.user_id, email).await {
            warn!("post_profile email: {status}");
            return Ok(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    Ok(StatusCode::OK)
}
