use tracing::{info, warn};

use tienda_net::models::{LoginRequest, RegisterRequest};
use tienda_shared::password::{hash_password, verify_password};
use tienda_shared::SyncTier;
use tienda_store::{NewUser, User};

use super::{AuthOutcome, SyncCoordinator};
use crate::error::{ClientError, Result};
use crate::events::{
    EventSource, UiEvent, MSG_LOGGED_OUT, MSG_LOGIN_FAILED, MSG_LOGIN_LOCAL, MSG_REGISTER_LOCAL,
};

const MSG_LOGIN_REMOTE: &str = "Logged in";
const MSG_REGISTER_REMOTE: &str = "Account created";

impl SyncCoordinator {
    /// Log in against the backend, falling back to the local account table.
    ///
    /// A remote success is authoritative: the session is stored first, then
    /// the local copy of the account is refreshed on a best-effort basis so a
    /// later offline login works.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome> {
        validate_credentials(email, password)?;

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        match self.gateway.login(&request).await {
            Ok(auth) => {
                self.set_session(auth.id)?;
                self.remember_user(email, password, auth.name.clone()).await;

                let outcome = AuthOutcome {
                    user_id: auth.id,
                    name: auth.name,
                    tier: SyncTier::Remote,
                    message: message_or(auth.message, MSG_LOGIN_REMOTE),
                };
                info!(user_id = outcome.user_id, tier = %outcome.tier, "login succeeded");
                self.emit_auth(&outcome.message);
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "remote login failed, trying local account");
                self.login_local(email, password).await
            }
        }
    }

    async fn login_local(&self, email: &str, password: &str) -> Result<AuthOutcome> {
        let email = email.to_string();
        let password = password.to_string();

        // Key derivation is CPU-bound; it runs on the blocking pool with the
        // lookup.
        let user = self
            .store
            .call(move |db| {
                Ok(db
                    .get_user_by_email(&email)?
                    .filter(|user| verify_password(&password, &user.password_hash)))
            })
            .await?;

        let Some(user) = user else {
            info!("local login rejected");
            self.emit_auth(MSG_LOGIN_FAILED);
            return Err(ClientError::Authentication(MSG_LOGIN_FAILED.to_string()));
        };

        self.set_session(user.id)?;
        info!(user_id = user.id, tier = %SyncTier::Local, "login succeeded");
        self.emit_auth(MSG_LOGIN_LOCAL);
        Ok(AuthOutcome {
            user_id: user.id,
            name: Some(user.name),
            tier: SyncTier::Local,
            message: MSG_LOGIN_LOCAL.to_string(),
        })
    }

    /// Create an account on the backend, or only on this device when the
    /// backend is unreachable.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthOutcome> {
        validate_credentials(email, password)?;
        if name.trim().is_empty() {
            return Err(ClientError::Validation("name must not be empty".into()));
        }

        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };

        match self.gateway.register(&request).await {
            Ok(auth) => {
                self.set_session(auth.id)?;
                let name = auth.name.unwrap_or_else(|| name.to_string());
                self.remember_user(email, password, Some(name.clone())).await;

                let outcome = AuthOutcome {
                    user_id: auth.id,
                    name: Some(name),
                    tier: SyncTier::Remote,
                    message: message_or(auth.message, MSG_REGISTER_REMOTE),
                };
                info!(user_id = outcome.user_id, tier = %outcome.tier, "registration succeeded");
                self.emit_auth(&outcome.message);
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "remote registration failed, creating local account");
                self.register_local(name, email, password).await
            }
        }
    }

    async fn register_local(&self, name: &str, email: &str, password: &str) -> Result<AuthOutcome> {
        let new_user = NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: String::new(),
        };
        let password = password.to_string();

        let created = self
            .store
            .call(move |db| {
                if db.get_user_by_email(&new_user.email)?.is_some() {
                    return Ok(None);
                }
                let user = NewUser {
                    password_hash: hash_password(&password),
                    ..new_user
                };
                db.insert_user(&user).map(Some)
            })
            .await?;

        let Some(user) = created else {
            return Err(ClientError::Validation(format!(
                "an account for {email} already exists on this device"
            )));
        };

        self.set_session(user.id)?;
        info!(user_id = user.id, tier = %SyncTier::Local, "registration succeeded");
        self.emit_auth(MSG_REGISTER_LOCAL);
        Ok(AuthOutcome {
            user_id: user.id,
            name: Some(user.name),
            tier: SyncTier::Local,
            message: MSG_REGISTER_LOCAL.to_string(),
        })
    }

    /// Forget the session.  Local accounts, carts and orders are kept.
    pub async fn logout(&self) -> Result<()> {
        let previous = self.current_user_id();
        self.clear_session()?;
        info!(user_id = ?previous, "logged out");
        self.events
            .emit(UiEvent::new(EventSource::Auth, MSG_LOGGED_OUT));
        Ok(())
    }

    /// Create or refresh the local copy of a remotely authenticated account.
    /// Failures are logged; the login they follow has already succeeded.
    async fn remember_user(&self, email: &str, password: &str, name: Option<String>) {
        let email = email.to_string();
        let password = password.to_string();

        let result = self
            .store
            .call(move |db| {
                let password_hash = hash_password(&password);
                match db.get_user_by_email(&email)? {
                    Some(existing) => {
                        let updated = User {
                            name: name.unwrap_or(existing.name),
                            password_hash,
                            ..existing
                        };
                        db.update_user(&updated)?;
                        Ok(updated.id)
                    }
                    None => {
                        let user = db.insert_user(&NewUser {
                            name: name.unwrap_or_else(|| default_name(&email)),
                            email,
                            password_hash,
                        })?;
                        Ok(user.id)
                    }
                }
            })
            .await;

        match result {
            Ok(local_id) => info!(local_id, "local account synchronised"),
            Err(e) => warn!(error = %e, "could not synchronise local account"),
        }
    }

    fn emit_auth(&self, message: &str) {
        self.events.emit(UiEvent::new(EventSource::Auth, message));
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(ClientError::Validation("email must not be empty".into()));
    }
    if password.is_empty() {
        return Err(ClientError::Validation("password must not be empty".into()));
    }
    Ok(())
}

fn message_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

// Local part of the address, used when the backend sends no display name.
fn default_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
