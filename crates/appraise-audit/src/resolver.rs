//! Actor resolution with fallback.

use std::sync::Arc;

use appraise_core::ActorId;
use tracing::warn;

use crate::directory::IdentityDirectory;

/// Resolves claimed actor identities to auditable ones.
///
/// A request may claim any actor id; the audit trail must only ever
/// attribute events to identities that exist. Claims that are absent,
/// unknown to the directory, or unverifiable because the directory
/// errored all degrade to the fallback actor. Resolution itself never
/// fails: an audit event is always attributable.
pub struct ActorResolver {
    directory: Arc<dyn IdentityDirectory>,
    fallback: ActorId,
}

impl ActorResolver {
    /// Build a resolver with the standard `anonymous` fallback.
    #[must_use]
    pub fn new(directory: Arc<dyn IdentityDirectory>) -> Self {
        Self {
            directory,
            fallback: ActorId::anonymous(),
        }
    }

    /// Override the fallback identity.
    #[must_use]
    pub fn with_fallback(mut self, fallback: ActorId) -> Self {
        self.fallback = fallback;
        self
    }

    /// The identity substituted for unresolvable claims.
    #[must_use]
    pub fn fallback(&self) -> &ActorId {
        &self.fallback
    }

    /// Resolve a claimed actor id to the identity the audit event is
    /// attributed to.
    ///
    /// Returns the claim when the directory knows it, and the fallback
    /// otherwise. Claiming the fallback id itself needs no lookup.
    /// Directory failures are logged at warning level and treated like
    /// missing identities.
    pub async fn resolve(&self, claimed: Option<&ActorId>) -> ActorId {
        let Some(claimed) = claimed else {
            return self.fallback.clone();
        };
        if *claimed == self.fallback {
            return self.fallback.clone();
        }

        match self.directory.find_identity(claimed).await {
            Ok(Some(_)) => claimed.clone(),
            Ok(None) => {
                warn!(
                    actor = %claimed,
                    "actor claim has no matching identity; recording as {}",
                    self.fallback
                );
                self.fallback.clone()
            },
            Err(err) => {
                warn!(
                    actor = %claimed,
                    error = %err,
                    "identity lookup failed; recording as {}",
                    self.fallback
                );
                self.fallback.clone()
            },
        }
    }
}

impl std::fmt::Debug for ActorResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorResolver")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}
