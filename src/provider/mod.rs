// SPDX-License-Identifier: MPL-2.0
//! Locale provider: wires routing input, diagnostics and resolution into a
//! single observable value for the rendering tree.
//!
//! # State machine
//!
//! The provider starts in [`ProviderState::Static`] holding the content
//! passed at construction. The first successful, still-current resolution
//! moves it to [`ProviderState::Loaded`]; later ones replace the loaded
//! content. There is no way back to `Static` and no empty state. A failed
//! resolution leaves whatever was visible in place.
//!
//! # Rendering
//!
//! [`LocaleProvider::render`] collapses routing validity and state into a
//! [`Render`] value. When the routing layer omitted the default locale, the
//! requested locale or the declared locale list, the provider renders
//! nothing and reports why.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use route_i18n::diagnostics::RecordingSink;
//! use route_i18n::domain::RouteLocales;
//! use route_i18n::provider::{LocaleProvider, Outcome, Render};
//! use route_i18n::registry::LocaleRegistry;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let registry = LocaleRegistry::builder("messages")
//!     .content("en", "Hello".to_string())
//!     .content("fr", "Bonjour".to_string())
//!     .build()
//!     .unwrap();
//! let sink = Arc::new(RecordingSink::default());
//! let mut provider = LocaleProvider::new(Arc::new(registry), "Hello".to_string(), sink);
//!
//! let pending = provider.update(RouteLocales::new("fr", "en", ["en", "fr"]));
//! assert!(matches!(provider.render(), Render::Static(_)));
//!
//! let outcome = pending.unwrap().run().await.unwrap();
//! assert_eq!(outcome, Outcome::Applied);
//! assert_eq!(provider.render(), Render::Loaded("Bonjour".to_string()));
//! # });
//! ```

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::diagnostics::{reconcile, Diagnostic, LocaleSource, LogSink, MissingSetting};
use crate::domain::{LocaleId, RouteLocales};
use crate::error::ResolveError;
use crate::registry::{LocaleContent, LocaleRegistry};
use crate::resolver::{LivenessToken, LocaleContentResolver, Resolution};

/// Name of the routing source in mismatch warnings unless overridden.
pub const DEFAULT_ROUTE_SOURCE: &str = "routing";

// =============================================================================
// State and render types
// =============================================================================

/// Content currently exposed by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderState<C> {
    /// Content supplied synchronously at construction.
    Static(C),
    /// Content from the most recent current resolution.
    Loaded { locale: LocaleId, content: C },
}

impl<C> ProviderState<C> {
    #[must_use]
    pub fn content(&self) -> &C {
        match self {
            ProviderState::Static(content) | ProviderState::Loaded { content, .. } => content,
        }
    }

    /// Locale of loaded content; `None` while still static.
    #[must_use]
    pub fn locale(&self) -> Option<&LocaleId> {
        match self {
            ProviderState::Static(_) => None,
            ProviderState::Loaded { locale, .. } => Some(locale),
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, ProviderState::Loaded { .. })
    }
}

/// What the rendering boundary should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Render<C> {
    /// Routing configuration is incomplete: render nothing, propagate nothing.
    Suppressed,
    /// Render descendants with the construction-time content.
    Static(C),
    /// Render descendants with resolved content.
    Loaded(C),
}

impl<C> Render<C> {
    #[must_use]
    pub fn content(&self) -> Option<&C> {
        match self {
            Render::Suppressed => None,
            Render::Static(content) | Render::Loaded(content) => Some(content),
        }
    }

    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Render::Suppressed)
    }
}

/// How a finished resolution was treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The result became the provider's state.
    Applied,
    /// A newer resolution started, or the provider was torn down, before
    /// this one finished. The result was dropped.
    Superseded,
}

// =============================================================================
// LocaleProvider
// =============================================================================

/// Owner of one [`ProviderState`].
pub struct LocaleProvider<C> {
    registry: Arc<LocaleRegistry<C>>,
    route_source: String,
    sink: Arc<dyn LogSink>,
    resolver: LocaleContentResolver,
    state: Arc<watch::Sender<ProviderState<C>>>,
    route: Option<RouteLocales>,
}

impl<C: LocaleContent> LocaleProvider<C> {
    /// Creates a provider exposing `static_content` until a resolution lands.
    pub fn new(
        registry: Arc<LocaleRegistry<C>>,
        static_content: C,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        let (state, _) = watch::channel(ProviderState::Static(static_content));
        Self {
            registry,
            route_source: DEFAULT_ROUTE_SOURCE.to_string(),
            sink,
            resolver: LocaleContentResolver::new(),
            state: Arc::new(state),
            route: None,
        }
    }

    /// Names the routing source in mismatch warnings.
    #[must_use]
    pub fn with_route_source(mut self, name: impl Into<String>) -> Self {
        self.route_source = name.into();
        self
    }

    /// Feeds the routing input of the current render.
    ///
    /// Identical input, and any input after [`teardown`](Self::teardown), is
    /// ignored. Otherwise the registry and the declared locales are
    /// reconciled and any mismatch is reported. A new resolution starts only
    /// when the requested or default locale changed and both are present; it
    /// supersedes every earlier one.
    pub fn update(&mut self, route: RouteLocales) -> Option<PendingResolution<C>> {
        if self.resolver.is_torn_down() || self.route.as_ref() == Some(&route) {
            return None;
        }

        let pair_changed = self
            .route
            .as_ref()
            .is_none_or(|previous| previous.pair() != route.pair());

        let declared = LocaleSource::new(&self.route_source, route.locales.as_deref());
        for mismatch in reconcile(self.registry.source(), declared) {
            Diagnostic::from(mismatch).report(self.sink.as_ref());
        }

        let resolution = if pair_changed {
            self.resolver.start(
                route.locale.as_ref(),
                route.default_locale.as_ref(),
                &self.registry,
            )
        } else {
            None
        };
        self.route = Some(route);

        resolution.map(|resolution| PendingResolution {
            resolution,
            state: Arc::clone(&self.state),
        })
    }

    /// Feeds routing input and waits for the resolution it started, if any.
    ///
    /// # Errors
    ///
    /// Returns the [`ResolveError`] of the started resolution.
    pub async fn update_and_resolve(
        &mut self,
        route: RouteLocales,
    ) -> Result<Option<Outcome>, ResolveError> {
        match self.update(route) {
            Some(pending) => pending.run().await.map(Some),
            None => Ok(None),
        }
    }

    /// Decides what to render. Reports the missing setting every time it
    /// suppresses rendering.
    pub fn render(&self) -> Render<C> {
        if let Some(setting) = self.missing_setting() {
            Diagnostic::from(setting).report(self.sink.as_ref());
            return Render::Suppressed;
        }

        match &*self.state.borrow() {
            ProviderState::Static(content) => Render::Static(content.clone()),
            ProviderState::Loaded { content, .. } => Render::Loaded(content.clone()),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ProviderState<C> {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change, for propagation to
    /// descendants.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProviderState<C>> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<LocaleRegistry<C>> {
        &self.registry
    }

    /// Last routing input passed to [`update`](Self::update).
    #[must_use]
    pub fn route(&self) -> Option<&RouteLocales> {
        self.route.as_ref()
    }

    fn missing_setting(&self) -> Option<MissingSetting> {
        match &self.route {
            None => Some(MissingSetting::DefaultLocale),
            Some(route) if route.locale.is_none() || route.default_locale.is_none() => {
                Some(MissingSetting::DefaultLocale)
            }
            Some(route) if route.locales.is_none() => Some(MissingSetting::Locales),
            Some(_) => None,
        }
    }
}

impl<C> LocaleProvider<C> {
    /// Stops every in-flight resolution from publishing.
    pub fn teardown(&mut self) {
        self.resolver.teardown();
    }
}

impl<C> Drop for LocaleProvider<C> {
    fn drop(&mut self) {
        self.resolver.teardown();
    }
}

impl<C> fmt::Debug for LocaleProvider<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleProvider")
            .field("registry", &self.registry)
            .field("route_source", &self.route_source)
            .field("route", &self.route)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// PendingResolution
// =============================================================================

/// A started resolution bound to the provider state it may update.
#[must_use = "a pending resolution only publishes when run"]
pub struct PendingResolution<C> {
    resolution: Resolution<C>,
    state: Arc<watch::Sender<ProviderState<C>>>,
}

impl<C: LocaleContent> PendingResolution<C> {
    #[must_use]
    pub fn token(&self) -> &LivenessToken {
        self.resolution.token()
    }

    #[must_use]
    pub fn requested(&self) -> &LocaleId {
        self.resolution.requested()
    }

    /// Waits for the loader and publishes its content if still current.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the lookup or the loader failed. The
    /// provider state is untouched in that case. Failures are reported even
    /// for superseded resolutions.
    pub async fn run(self) -> Result<Outcome, ResolveError> {
        let (token, result) = self.resolution.finish().await;
        let resolved = result.inspect_err(|err| {
            tracing::warn!(sequence = token.sequence(), %err, "locale resolution failed");
        })?;

        let locale = resolved.locale.clone();
        let applied = token.apply_if_current(|| {
            self.state.send_replace(ProviderState::Loaded {
                locale: resolved.locale,
                content: resolved.content,
            });
        });

        if applied.is_some() {
            tracing::debug!(sequence = token.sequence(), %locale, "locale content applied");
            Ok(Outcome::Applied)
        } else {
            tracing::debug!(
                sequence = token.sequence(),
                %locale,
                "discarding superseded locale content"
            );
            Ok(Outcome::Superseded)
        }
    }

    /// Runs the resolution on the current tokio runtime.
    pub fn spawn(self) -> JoinHandle<Result<Outcome, ResolveError>> {
        tokio::spawn(self.run())
    }
}

impl<C> fmt::Debug for PendingResolution<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingResolution")
            .field("resolution", &self.resolution)
            .finish_non_exhaustive()
    }
}
