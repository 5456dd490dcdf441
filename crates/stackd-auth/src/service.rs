//! Identity service
//!
//! Stateless façade over the credential store: password verification,
//! token issuance, role transitions, and the optional directory race.

use crate::config::AuthConfig;
use crate::directory::{self, DirectoryAuthenticator};
use crate::password;
use crate::store::CredentialStore;
use crate::token::TokenSigner;
use stackd_common::{Error, Principal, Result, Role, User};
use std::sync::Arc;

/// Synthetic identity asserted by the bootstrap token
pub const BOOTSTRAP_NAME: &str = "bootstrap";

/// Identity & authorization service
pub struct IdentityService {
    store: Arc<dyn CredentialStore>,
    directories: Vec<Arc<dyn DirectoryAuthenticator>>,
    signer: TokenSigner,
    config: AuthConfig,
}

impl IdentityService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        directories: Vec<Arc<dyn DirectoryAuthenticator>>,
        config: AuthConfig,
    ) -> Self {
        Self {
            store,
            directories,
            signer: TokenSigner::new(&config.secret),
            config,
        }
    }

    /// True iff the credential store holds zero users
    pub async fn is_store_empty(&self) -> Result<bool> {
        Ok(self.store.count().await? == 0)
    }

    /// Issue a short-lived token asserting a synthetic admin identity.
    ///
    /// Only meaningful before any user exists; issuance itself performs no
    /// authorization check, the boundary decides when to offer it.
    pub fn issue_bootstrap_token(&self) -> Result<String> {
        let principal = Principal::new(BOOTSTRAP_NAME, Role::Admin);
        tracing::info!("issuing bootstrap token");
        self.signer.issue(&principal, self.config.bootstrap_ttl)
    }

    /// Authenticate by name and password, returning a session token.
    ///
    /// All configured directories are raced first; a directory success
    /// issues a token immediately with the locally-known role for that name
    /// (default role when unknown). Otherwise the local password hash is
    /// checked. The failure is a single generic error either way.
    pub async fn authenticate(&self, name: &str, pass: &str) -> Result<String> {
        let local = self.store.find_by_name(name).await?;

        if !self.directories.is_empty() && directory::race(&self.directories, name, pass).await {
            let role = local.map(|u| u.role).unwrap_or_default();
            tracing::debug!(user = %name, "directory authentication succeeded");
            return self
                .signer
                .issue(&Principal::new(name, role), self.config.token_ttl);
        }

        match local {
            Some(user) if password::verify(pass, &user.password_hash) => self
                .signer
                .issue(&user.principal(), self.config.token_ttl),
            // Unknown name and wrong password are indistinguishable.
            _ => Err(Error::AuthenticationFailed),
        }
    }

    /// Create a user record.
    pub async fn create_user(
        &self,
        actor: &Principal,
        name: &str,
        pass: &str,
        role: Option<Role>,
    ) -> Result<User> {
        // The bootstrap name is reserved for the synthetic token identity.
        if name == BOOTSTRAP_NAME {
            return Err(Error::InvalidOperation(format!(
                "'{}' is a reserved name",
                BOOTSTRAP_NAME
            )));
        }

        // While a directory is configured it is the sole authentication
        // source; only the synthetic bootstrap admin may create local
        // records.
        let is_bootstrap = actor.name == BOOTSTRAP_NAME && actor.is_admin();
        if !self.directories.is_empty() && !is_bootstrap {
            return Err(Error::InvalidOperation(
                "local user creation is disabled while a directory is configured".into(),
            ));
        }

        let role = role.unwrap_or_default();
        if role.is_admin() && !actor.is_admin() {
            return Err(Error::forbidden(&actor.name));
        }

        self.check_password_policy(pass)?;

        if self.store.find_by_name(name).await?.is_some() {
            return Err(Error::Conflict(name.to_string()));
        }

        let user = User {
            name: name.to_string(),
            password_hash: password::hash(pass),
            role,
        };
        self.store.insert(user.clone()).await?;
        tracing::info!(user = %name, ?role, "user created");
        Ok(user)
    }

    /// Update a user's password and/or role.
    pub async fn update_user(
        &self,
        actor: &Principal,
        name: &str,
        pass: Option<&str>,
        role: Option<Role>,
    ) -> Result<User> {
        let mut user = self
            .store
            .find_by_name(name)
            .await?
            .ok_or_else(|| Error::NotFound(name.to_string()))?;

        if let Some(pass) = pass {
            // Password changes are self-service only.
            if actor.name != name {
                return Err(Error::forbidden(&actor.name));
            }
            self.check_password_policy(pass)?;
            user.password_hash = password::hash(pass);
        }

        if let Some(role) = role {
            if !actor.is_admin() {
                return Err(Error::forbidden(&actor.name));
            }
            user.role = role;
        }

        self.store.replace(user.clone()).await?;
        tracing::info!(user = %name, "user updated");
        Ok(user)
    }

    /// List all users (admin only)
    pub async fn list_users(&self, actor: &Principal) -> Result<Vec<User>> {
        if !actor.is_admin() {
            return Err(Error::forbidden(&actor.name));
        }
        self.store.list_all().await
    }

    /// Verify a presented token and return its principal
    pub fn authorize(&self, token: &str) -> Result<Principal> {
        self.signer.verify(token)
    }

    fn check_password_policy(&self, pass: &str) -> Result<()> {
        if pass.len() < self.config.min_password_len {
            return Err(Error::PolicyViolation(format!(
                "password must be at least {} characters",
                self.config.min_password_len
            )));
        }
        Ok(())
    }
}
