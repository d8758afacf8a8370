// SPDX-License-Identifier: MPL-2.0
//! Asynchronous locale content resolution with start-order liveness.
//!
//! [`resolve`] performs one lookup: the requested locale if it is
//! registered, the fallback otherwise, and invokes the chosen loader once.
//!
//! [`LocaleContentResolver`] adds the ordering guarantee a provider needs.
//! Every resolution it starts is tagged with a [`LivenessToken`] carrying a
//! monotonically increasing sequence number. Only the token of the most
//! recently started resolution is current, and no token is current once the
//! owner has been torn down. Loaders are never cancelled; a superseded
//! resolution still runs to completion and its result is simply dropped by
//! whoever checks the token.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::LocaleId;
use crate::error::{LoadError, ResolveError};
use crate::registry::{LoadFuture, LocaleContent, LocaleRegistry};

/// Content produced by a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<C> {
    /// Locale whose loader produced the content.
    pub locale: LocaleId,
    pub content: C,
    /// True when the requested locale was not registered.
    pub used_fallback: bool,
}

/// Resolves `requested`, falling back to `fallback`, against `registry`.
///
/// # Errors
///
/// - [`ResolveError::LocaleNotFound`] when neither locale is registered.
/// - [`ResolveError::LoaderFailure`] when the loader fails or yields no
///   content.
pub async fn resolve<C: LocaleContent>(
    requested: &LocaleId,
    fallback: &LocaleId,
    registry: &LocaleRegistry<C>,
) -> Result<Resolved<C>, ResolveError> {
    Attempt::begin(requested, fallback, registry).finish().await
}

/// A started lookup. The loader has already been invoked when this exists.
struct Attempt<C> {
    selected: Result<Selected<C>, ResolveError>,
}

struct Selected<C> {
    locale: LocaleId,
    used_fallback: bool,
    load: LoadFuture<C>,
}

impl<C: LocaleContent> Attempt<C> {
    fn begin(requested: &LocaleId, fallback: &LocaleId, registry: &LocaleRegistry<C>) -> Self {
        let selected = if let Some(loader) = registry.get(requested.as_str()) {
            Ok((requested, false, loader))
        } else if let Some(loader) = registry.get(fallback.as_str()) {
            tracing::debug!(
                %requested,
                %fallback,
                "requested locale not registered, using fallback"
            );
            Ok((fallback, true, loader))
        } else {
            Err(ResolveError::LocaleNotFound {
                requested: requested.clone(),
                fallback: fallback.clone(),
            })
        };

        Self {
            selected: selected.map(|(locale, used_fallback, loader)| Selected {
                locale: locale.clone(),
                used_fallback,
                load: (**loader)(),
            }),
        }
    }

    async fn finish(self) -> Result<Resolved<C>, ResolveError> {
        let Selected {
            locale,
            used_fallback,
            load,
        } = self.selected?;

        match load.await {
            Ok(Some(content)) => Ok(Resolved {
                locale,
                content,
                used_fallback,
            }),
            Ok(None) => Err(ResolveError::LoaderFailure {
                locale,
                source: LoadError::Empty,
            }),
            Err(source) => Err(ResolveError::LoaderFailure { locale, source }),
        }
    }
}

// =============================================================================
// Liveness
// =============================================================================

#[derive(Debug, Default)]
struct Liveness {
    latest: u64,
    torn_down: bool,
}

/// Start-time tag of one resolution.
#[derive(Clone)]
pub struct LivenessToken {
    sequence: u64,
    liveness: Arc<Mutex<Liveness>>,
}

impl LivenessToken {
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// True while no newer resolution was started and the owner is alive.
    #[must_use]
    pub fn is_current(&self) -> bool {
        let liveness = self.liveness.lock();
        !liveness.torn_down && liveness.latest == self.sequence
    }

    /// Runs `apply` only if the token is current.
    ///
    /// The liveness lock is held while `apply` runs, so a resolution started
    /// concurrently cannot interleave between the check and the write.
    pub fn apply_if_current<R>(&self, apply: impl FnOnce() -> R) -> Option<R> {
        let liveness = self.liveness.lock();
        if liveness.torn_down || liveness.latest != self.sequence {
            return None;
        }
        Some(apply())
    }
}

impl fmt::Debug for LivenessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LivenessToken")
            .field("sequence", &self.sequence)
            .field("current", &self.is_current())
            .finish()
    }
}

// =============================================================================
// LocaleContentResolver
// =============================================================================

/// Starts resolutions and tracks which one is allowed to publish.
#[derive(Debug, Default)]
pub struct LocaleContentResolver {
    liveness: Arc<Mutex<Liveness>>,
}

impl LocaleContentResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a resolution, superseding any earlier one.
    ///
    /// Returns `None` without superseding anything when either locale is
    /// missing; the caller reports the incomplete configuration.
    pub fn start<C: LocaleContent>(
        &self,
        requested: Option<&LocaleId>,
        fallback: Option<&LocaleId>,
        registry: &LocaleRegistry<C>,
    ) -> Option<Resolution<C>> {
        let (requested, fallback) = (requested?, fallback?);
        let token = self.next_token();
        tracing::debug!(
            %requested,
            %fallback,
            sequence = token.sequence,
            "starting locale resolution"
        );
        Some(Resolution {
            requested: requested.clone(),
            token,
            attempt: Attempt::begin(requested, fallback, registry),
        })
    }

    /// Makes every outstanding token stale, permanently.
    pub fn teardown(&self) {
        self.liveness.lock().torn_down = true;
    }

    #[must_use]
    pub(crate) fn is_torn_down(&self) -> bool {
        self.liveness.lock().torn_down
    }

    #[cfg(test)]
    fn latest(&self) -> u64 {
        self.liveness.lock().latest
    }

    fn next_token(&self) -> LivenessToken {
        let mut liveness = self.liveness.lock();
        liveness.latest += 1;
        LivenessToken {
            sequence: liveness.latest,
            liveness: Arc::clone(&self.liveness),
        }
    }
}

/// An in-flight resolution started by [`LocaleContentResolver::start`].
pub struct Resolution<C> {
    requested: LocaleId,
    token: LivenessToken,
    attempt: Attempt<C>,
}

impl<C: LocaleContent> Resolution<C> {
    #[must_use]
    pub fn token(&self) -> &LivenessToken {
        &self.token
    }

    #[must_use]
    pub fn requested(&self) -> &LocaleId {
        &self.requested
    }

    /// Waits for the loader. The token is handed back so the caller can
    /// decide whether the result may still be published.
    pub async fn finish(self) -> (LivenessToken, Result<Resolved<C>, ResolveError>) {
        let result = self.attempt.finish().await;
        (self.token, result)
    }
}

impl<C> fmt::Debug for Resolution<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolution")
            .field("requested", &self.requested)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}
