use firestore::errors::{BackoffError, FirestoreError};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{api::FirestoreApi, documents::UserData, Status};

#[instrument(name = "users::read", level = "trace", skip(firestore))]
pub async fn read(firestore: &FirestoreApi, user_id: &str) -> Result<UserData, Status> {
    let doc = firestore
        .db()
        .fluent()
        .select()
        .by_id_in(USERS)
        .obj()
        .one(user_id)
        .await?;

    match doc {
        Some(doc) => Ok(doc),
        None => Err(Status::not_found(format!(
            "Firestore document '{USERS}/{user_id}' was not found"
        ))),
    }
}

#[instrument(name = "users::write", level = "trace", skip(firestore, user_data))]
pub async fn write(firestore: &FirestoreApi, user_data: &UserData) -> Result<(), Status> {
    firestore
        .db()
        .fluent()
        .update()
        .in_col(USERS)
        .document_id(&user_data.uid)
        .object(user_data)
        .execute::<()>()
        .await?;
    Ok(())
}

#[instrument(name = "users::update_username", level = "trace", skip(firestore))]
pub async fn update_username(
    firestore: &FirestoreApi,
    user_id: &str,
    username: &str,
) -> Result<(), Status> {
    let mut user_data = read_or_default(firestore, user_id).await?;
    user_data.username = username.to_owned();
    write(firestore, &user_data).await
}

#[instrument(name = "users::update_email", level = "trace", skip(firestore))]
pub async fn update_email(
    firestore: &FirestoreApi,
    user_id: &str,
    email: &str,
) -> Result<(), Status> {
    let mut user_data = read_or_default(firestore, user_id).await?;
    user_data.email = email.to_owned();
    write(firestore, &user_data).await
}

/// Reconciles the user's platform selection under
/// 'users/{user_id}/platforms': selected platforms are written, previously
/// selected platforms that were dropped are deleted. Writes and deletes
/// commit in a single transaction; on failure the stored selection is
/// unchanged.
#[instrument(
    name = "users::set_platforms",
    level = "trace",
    skip(firestore, user_id, selected, previous)
)]
pub async fn set_platforms(
    firestore: &FirestoreApi,
    user_id: &str,
    selected: &[String],
    previous: &[String],
) -> Result<(), Status> {
    let parent_path = firestore.db().parent_path(USERS, user_id)?;
    let selected = selected.to_vec();
    let previous = previous.to_vec();

    firestore
        .db()
        .run_transaction(|db, transaction| {
            let parent_path = parent_path.clone();
            let selected = selected.clone();
            let previous = previous.clone();
            async move {
                for platform in &selected {
                    db.fluent()
                        .update()
                        .in_col(PLATFORMS)
                        .document_id(platform_slug(platform))
                        .parent(&parent_path)
                        .object(&PlatformChoice {
                            platform: platform.clone(),
                        })
                        .add_to_transaction(transaction)?;
                }

                for platform in stale_platforms(&selected, &previous) {
                    db.fluent()
                        .delete()
                        .from(PLATFORMS)
                        .parent(&parent_path)
                        .document_id(platform_slug(platform))
                        .add_to_transaction(transaction)?;
                }

                Ok::<(), BackoffError<FirestoreError>>(())
            }
            .boxed()
        })
        .await?;

    Ok(())
}

/// Previously selected platforms absent from the new selection.
fn stale_platforms<'a>(selected: &[String], previous: &'a [String]) -> Vec<&'a String> {
    previous
        .iter()
        .filter(|platform| !selected.contains(platform))
        .collect()
}

async fn read_or_default(firestore: &FirestoreApi, user_id: &str) -> Result<UserData, Status> {
    match read(firestore, user_id).await {
        Ok(user_data) => Ok(user_data),
        Err(Status::NotFound(_)) => Ok(UserData {
            uid: user_id.to_owned(),
            ..Default::default()
        }),
        Err(status) => Err(status),
    }
}

fn platform_slug(platform: &str) -> String {
    platform
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
struct PlatformChoice {
    platform: String,
}

const USERS: &str = "users";
const PLATFORMS: &str = "platforms";
