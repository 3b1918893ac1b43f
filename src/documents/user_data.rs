use serde::{Deserialize, Serialize};

/// Document type under 'users/{user_id}' with the user's profile.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub uid: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    #[serde(default)]
    pub created_at: u64,
}
