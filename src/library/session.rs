use std::sync::{Arc, RwLock};

use crate::Status;

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    SignedOut,
    SignedIn { uid: String },
}

/// Explicit sign-in session shared by the repository and view-models.
///
/// All document paths are scoped under the signed-in uid; operations invoked
/// while signed out fail with `Status::Unauthenticated` instead of reaching
/// the store.
#[derive(Clone)]
pub struct UserSession {
    state: Arc<RwLock<SessionState>>,
}

impl UserSession {
    pub fn signed_out() -> Self {
        UserSession {
            state: Arc::new(RwLock::new(SessionState::SignedOut)),
        }
    }

    pub fn signed_in(uid: impl Into<String>) -> Self {
        UserSession {
            state: Arc::new(RwLock::new(SessionState::SignedIn { uid: uid.into() })),
        }
    }

    pub fn sign_in(&self, uid: impl Into<String>) {
        *self.state.write().unwrap() = SessionState::SignedIn { uid: uid.into() };
    }

    pub fn sign_out(&self) {
        *self.state.write().unwrap() = SessionState::SignedOut;
    }

    pub fn uid(&self) -> Option<String> {
        match &*self.state.read().unwrap() {
            SessionState::SignedIn { uid } => Some(uid.clone()),
            SessionState::SignedOut => None,
        }
    }

    pub fn require_uid(&self) -> Result<String, Status> {
        self.uid()
            .ok_or_else(|| Status::unauthenticated("No user is signed in"))
    }
}
