use crate::api::FirestoreApi;
use std::sync::Arc;
use tracing::warn;
use warp::{self, Filter};

use super::{handlers, models, resources::*};

/// Returns a Filter with all available routes.
pub fn routes(
    firestore: Arc<FirestoreApi>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    home()
        .or(get_games(Arc::clone(&firestore)))
        .or(post_wishlist(Arc::clone(&firestore)))
        .or(post_profile(firestore))
        .or_else(|e| async {
            warn! {"Rejected route: {:?}", e};
            Err(e)
        })
}

/// GET /
fn home() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!().and(warp::get()).and_then(handlers::welcome)
}

/// GET /games
fn get_games(
    firestore: Arc<FirestoreApi>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("games")
        .and(warp::get())
        .and(with_firestore(firestore))
        .and_then(handlers::get_games)
}

/// POST /library/wishlist
fn post_wishlist(
    firestore: Arc<FirestoreApi>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("library" / "wishlist")
        .and(warp::post())
        .and(json_body::<models::WishlistOp>())
        .and(with_firestore(firestore))
        .and_then(handlers::post_wishlist)
}

/// POST /users/profile
fn post_profile(
    firestore: Arc<FirestoreApi>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("users" / "profile")
        .and(warp::post())
        .and(json_body::<models::ProfileOp>())
        .and(with_firestore(firestore))
        .and_then(handlers::post_profile)
}

fn json_body<T: serde::de::DeserializeOwned + Send>(
) -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(16 * 1024).and(warp::body::json())
}
