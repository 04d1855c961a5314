//! Login, registration and logout

use tracing::info;

use urquest_core::Session;

use super::QuestApp;
use crate::endpoints;
use crate::error::{ClientError, Result};
use crate::wire::{Credentials, LoginResponse, RegisterResponse};

impl QuestApp {
    fn credentials<'a>(&self, username: &'a str, password: &'a str) -> Result<Credentials<'a>> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(self.reject(ClientError::Validation("ENTER CREDENTIALS".to_string())));
        }
        Ok(Credentials { username, password })
    }

    /// Authenticate and persist the resulting session
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let credentials = self.credentials(username, password)?;
        let response: LoginResponse = self.remote.post(endpoints::LOGIN, &credentials).await?;

        let session = response.into_session();
        self.stored(self.store.save(&session).await)?;
        info!(user = %session.user.id, "Logged in");
        self.notifier.success("ACCESS GRANTED");
        Ok(session)
    }

    /// Create an account; the user still has to log in afterwards
    pub async fn register(&self, username: &str, password: &str) -> Result<RegisterResponse> {
        let credentials = self.credentials(username, password)?;
        let response: RegisterResponse =
            self.remote.post(endpoints::REGISTER, &credentials).await?;
        self.notifier.success("REGISTRATION SUCCESS. PLEASE LOGIN.");
        Ok(response)
    }

    pub async fn logout(&self) -> Result<()> {
        self.stored(self.store.clear().await)?;
        info!("Logged out");
        Ok(())
    }
}
