//! Login gate backed by an opaque token from the identity provider.
//!
//! The token is stored and compared for presence only; it is never parsed.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::storage::{Store, IDENTITY_KEY};

#[derive(Serialize, Deserialize)]
struct StoredIdentity {
    token: String,
}

pub struct Identity {
    token: Option<String>,
    store: Rc<dyn Store>,
}

impl Identity {
    pub fn load(store: Rc<dyn Store>) -> Self {
        let token = store
            .get(IDENTITY_KEY)
            .ok()
            .flatten()
            .and_then(|json| serde_json::from_str::<StoredIdentity>(&json).ok())
            .map(|stored| stored.token)
            .filter(|token| !token.is_empty());
        Self { token, store }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn require(&self) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(AppError::NotAuthenticated)
        }
    }

    pub fn login(&mut self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::UserInputMissing("identity token".to_string()));
        }
        let json = serde_json::to_string(&StoredIdentity {
            token: token.to_string(),
        })?;
        if let Err(e) = self.store.set(IDENTITY_KEY, &json) {
            warn!("Login will not survive a restart: {}", e);
        }
        self.token = Some(token.to_string());
        info!("Logged in");
        Ok(())
    }

    pub fn logout(&mut self) {
        self.token = None;
        if let Err(e) = self.store.remove(IDENTITY_KEY) {
            warn!("Failed to forget stored identity: {}", e);
        }
        info!("Logged out");
    }
}
