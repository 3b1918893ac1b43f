use crate::api::FirestoreApi;
use std::{convert::Infallible, sync::Arc};
use warp::Filter;

pub fn with_firestore(
    firestore: Arc<FirestoreApi>,
) -> impl Filter<Extract = (Arc<FirestoreApi>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&firestore))
}
