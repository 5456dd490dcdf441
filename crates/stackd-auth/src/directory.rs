//! External directory authentication
//!
//! When one or more directories are configured they are all tried
//! concurrently for every authentication attempt: first success wins,
//! stragglers run to completion detached and their outcomes are discarded.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// An external directory (LDAP-style) capable of verifying credentials
#[async_trait]
pub trait DirectoryAuthenticator: Send + Sync {
    /// Directory name, for logging
    fn name(&self) -> &str;

    /// Attempt a bind with the supplied credentials.
    ///
    /// `Ok(())` means the directory accepted them. Errors are expected
    /// under the multi-directory race and are logged, never surfaced.
    async fn authenticate(&self, name: &str, password: &str) -> Result<(), String>;
}

/// Race all directories; resolve true on the first success.
///
/// Each attempt runs as a detached task reporting into a channel, so the
/// caller never blocks on stragglers once one directory has answered yes.
/// Returns false once every attempt has settled without a success.
pub async fn race(
    directories: &[Arc<dyn DirectoryAuthenticator>],
    name: &str,
    password: &str,
) -> bool {
    if directories.is_empty() {
        return false;
    }

    let (tx, mut rx) = mpsc::channel(directories.len());
    for directory in directories {
        let directory = Arc::clone(directory);
        let tx = tx.clone();
        let name = name.to_string();
        let password = password.to_string();
        tokio::spawn(async move {
            let outcome = directory.authenticate(&name, &password).await;
            if let Err(ref reason) = outcome {
                tracing::debug!(
                    directory = directory.name(),
                    user = %name,
                    "directory authentication failed: {}",
                    reason
                );
            }
            // Receiver may be gone if a sibling already won.
            let _ = tx.send(outcome.is_ok()).await;
        });
    }
    drop(tx);

    while let Some(success) = rx.recv().await {
        if success {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct FixedDirectory {
        name: String,
        accept: bool,
        delay: Duration,
    }

    #[async_trait]
    impl DirectoryAuthenticator for FixedDirectory {
        fn name(&self) -> &str {
            &self.name
        }

        async fn authenticate(&self, _name: &str, _password: &str) -> Result<(), String> {
            tokio::time::sleep(self.delay).await;
            if self.accept {
                Ok(())
            } else {
                Err("bind rejected".into())
            }
        }
    }

    fn dir(name: &str, accept: bool, delay_ms: u64) -> Arc<dyn DirectoryAuthenticator> {
        Arc::new(FixedDirectory {
            name: name.into(),
            accept,
            delay: Duration::from_millis(delay_ms),
        })
    }

    #[tokio::test]
    async fn empty_set_is_a_miss() {
        assert!(!race(&[], "alice", "pw").await);
    }

    #[tokio::test]
    async fn first_success_wins_without_waiting_for_stragglers() {
        let directories = vec![dir("slow", false, 5_000), dir("fast", true, 0)];

        let start = std::time::Instant::now();
        assert!(race(&directories, "alice", "pw").await);
        // The slow directory must not have blocked the resolution.
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn all_failures_resolve_false() {
        let directories = vec![dir("a", false, 0), dir("b", false, 0)];
        assert!(!race(&directories, "alice", "pw").await);
    }
}
