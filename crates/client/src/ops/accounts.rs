//! Account registration, login, reset and lookup.

use stockbook_core::{Account, AccountSummary, Ack, ClientError, ClientResult, normalize_email};

use crate::gateway::RemoteOutcome;
use crate::hooks::LoadingGuard;
use crate::queue::SyncAction;
use crate::store::USERS;
use crate::types::{CallPolicy, RemoteUser, SYNC_TIMEOUT, UserReply, UsersReply, parse_ack};

use super::StockClient;

/// Registration input.
///
/// The security question and answer travel to the mirror only; the local
/// record keeps just the hint.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub security_question: String,
    pub security_answer: String,
    pub hint: String,
}

impl StockClient {
    /// Register a new account: local write-through with case-insensitive
    /// email dedupe, then a best-effort mirror call.
    ///
    /// Mirror failures are logged and swallowed, never queued; the local
    /// write already succeeded and is the source of truth.
    pub async fn register(&self, reg: Registration) -> ClientResult<Ack> {
        let mut users: Vec<Account> = self.store.get(USERS).await;
        if users.iter().any(|u| u.has_email(&reg.email)) {
            return Err(ClientError::DuplicateAccount);
        }

        users.push(Account {
            name: reg.name.clone(),
            email: reg.email.clone(),
            password: reg.password.clone(),
            hint: reg.hint.clone(),
        });
        self.store
            .put(USERS, &users)
            .await
            .map_err(|err| ClientError::store(err.to_string()))?;
        tracing::info!(email = %reg.email, "account saved locally");

        if self.gateway.is_configured() {
            let outcome = self
                .gateway
                .invoke(
                    "register",
                    &[
                        ("name", &reg.name),
                        ("email", &reg.email),
                        ("password", &reg.password),
                        ("securityQuestion", &reg.security_question),
                        ("securityAnswer", &reg.security_answer),
                        ("hint", &reg.hint),
                    ],
                    SYNC_TIMEOUT,
                )
                .await;
            match outcome {
                RemoteOutcome::Body(_) => tracing::debug!("account mirrored to remote"),
                other => tracing::warn!(
                    ?other,
                    "registration mirror failed, continuing with local copy"
                ),
            }
        }

        Ok(Ack::confirmed(true, "registration complete"))
    }

    /// Local-first login: a local hit wins without any remote call. The
    /// mirror is consulted only on a local miss when configured, and a
    /// remote hit is cached locally so the next login stays local.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AccountSummary> {
        let email_key = normalize_email(email);
        let password = password.trim();

        let users: Vec<Account> = self.store.get(USERS).await;
        if let Some(user) = users
            .iter()
            .find(|u| normalize_email(&u.email) == email_key && u.password == password)
        {
            tracing::debug!(email = %email_key, "login satisfied from local store");
            return Ok(user.summary());
        }

        if !self.gateway.is_configured() {
            return Err(ClientError::InvalidCredentials);
        }

        let _loading = LoadingGuard::start(&self.hooks, "Looking up account...");
        let body = match self
            .gateway
            .invoke("login", &[("email", email), ("password", password)], SYNC_TIMEOUT)
            .await
            .into_body()
        {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!("remote login failed: {err}");
                return Err(ClientError::InvalidCredentials);
            }
        };

        let reply: UserReply = match serde_json::from_str(&body) {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!("unparseable login reply: {err}");
                return Err(ClientError::InvalidCredentials);
            }
        };
        let Some(user) = reply.user.filter(|_| reply.success) else {
            return Err(ClientError::InvalidCredentials);
        };

        // Cache the mirror hit. The stored password is the one the user
        // typed; the mirror never reveals its copy.
        let mut users = users;
        if !users.iter().any(|u| normalize_email(&u.email) == email_key) {
            users.push(Account {
                name: user.name.clone(),
                email: user.email.clone(),
                password: password.to_string(),
                hint: String::new(),
            });
            if let Err(err) = self.store.put(USERS, &users).await {
                tracing::warn!("failed to cache remote account locally: {err:?}");
            }
        }

        Ok(AccountSummary {
            name: user.name,
            email: user.email,
        })
    }

    /// Queue a password reset for background delivery; never synchronous.
    ///
    /// The locally cached password is deliberately left untouched: a
    /// delivered reset changes only the mirror, and the local copy is only
    /// refreshed by a later remote login.
    pub async fn reset_password(&self, email: &str, new_password: &str) -> ClientResult<()> {
        self.queue
            .enqueue(SyncAction::ResetPassword {
                email: email.to_string(),
                new_password: new_password.to_string(),
            })
            .await
            .map_err(|err| ClientError::store(err.to_string()))
    }

    /// List users from the mirror. No local fallback exists for this read.
    pub async fn get_users(&self) -> ClientResult<Vec<RemoteUser>> {
        self.require_configured()?;
        let _loading = LoadingGuard::start(&self.hooks, "Loading users...");

        let body = self.gateway.invoke("getUsers", &[], SYNC_TIMEOUT).await.into_body()?;
        let reply: UsersReply =
            serde_json::from_str(&body).map_err(|err| ClientError::parse(err.to_string()))?;
        if reply.success {
            Ok(reply.users)
        } else {
            Err(ClientError::parse(reply.message))
        }
    }

    /// Fast single-user lookup. `suppress_loading` lets background pollers
    /// skip the loading hook. Transport or parse failure yields `None`.
    pub async fn find_user(
        &self,
        email: &str,
        suppress_loading: bool,
    ) -> ClientResult<Option<RemoteUser>> {
        self.require_configured()?;
        let _loading = (!suppress_loading)
            .then(|| LoadingGuard::start(&self.hooks, "Checking account..."));

        let body = match self
            .gateway
            .invoke("findUser", &[("email", email)], SYNC_TIMEOUT)
            .await
            .into_body()
        {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!("findUser failed: {err}");
                return Ok(None);
            }
        };

        match serde_json::from_str::<UserReply>(&body) {
            Ok(reply) if reply.success => Ok(reply.user),
            Ok(_) => Ok(None),
            Err(err) => {
                tracing::warn!("unparseable findUser reply: {err}");
                Ok(None)
            }
        }
    }

    /// Delete a user from the mirror. Query-encoded with real response
    /// parsing; an unparseable body counts as implicit success. The local
    /// `users` collection is not touched.
    pub async fn delete_user(&self, email: &str) -> ClientResult<Ack> {
        self.require_configured()?;
        let _loading = LoadingGuard::start(&self.hooks, "Deleting user...");

        let policy = CallPolicy::lenient();
        let body = self
            .gateway
            .invoke("deleteUser", &[("email", email)], policy.timeout)
            .await
            .into_body()?;
        parse_ack(&body, policy, "user deleted")
    }
}
