// SPDX-License-Identifier: MPL-2.0
//! Locale registry: the application's static mapping from locale to loader.
//!
//! A registry is declared once, is immutable afterwards and is meant to be
//! shared (behind an [`Arc`]) by every provider that resolves against it.
//!
//! # Example
//!
//! ```
//! use route_i18n::registry::LocaleRegistry;
//!
//! let registry = LocaleRegistry::<String>::builder("messages")
//!     .content("en", "Hello".to_string())
//!     .locale("fr", || async { Ok(Some("Bonjour".to_string())) })
//!     .build()
//!     .expect("unique locales");
//!
//! assert_eq!(registry.len(), 2);
//! assert!(registry.contains("fr"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};

use crate::diagnostics::LocaleSource;
use crate::domain::LocaleId;
use crate::error::{LoadError, RegistryError};

/// Bounds every locale content payload satisfies.
///
/// Content is opaque to this crate; it only needs to be cheap enough to
/// clone into each subscriber and safe to hand across tasks.
pub trait LocaleContent: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> LocaleContent for T {}

/// Future returned by a [`Loader`]. `Ok(None)` means the loader produced
/// no content.
pub type LoadFuture<C> = BoxFuture<'static, Result<Option<C>, LoadError>>;

/// Zero-argument asynchronous producer of one locale's content.
pub type Loader<C> = Arc<dyn Fn() -> LoadFuture<C> + Send + Sync>;

/// Named, insertion-ordered mapping from [`LocaleId`] to [`Loader`].
pub struct LocaleRegistry<C> {
    name: String,
    locales: Vec<LocaleId>,
    loaders: HashMap<LocaleId, Loader<C>>,
}

impl<C: LocaleContent> LocaleRegistry<C> {
    /// Starts declaring a registry. `name` identifies it in warnings.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> RegistryBuilder<C> {
        RegistryBuilder {
            name: name.into(),
            locales: Vec::new(),
            loaders: HashMap::new(),
            duplicate: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered locales in declaration order.
    #[must_use]
    pub fn locales(&self) -> &[LocaleId] {
        &self.locales
    }

    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&Loader<C>> {
        self.loaders.get(locale)
    }

    #[must_use]
    pub fn contains(&self, locale: &str) -> bool {
        self.loaders.contains_key(locale)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locales.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    /// Views the registry as one side of a reconciliation.
    #[must_use]
    pub fn source(&self) -> LocaleSource<'_> {
        LocaleSource::new(&self.name, Some(&self.locales))
    }
}

impl<C> fmt::Debug for LocaleRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleRegistry")
            .field("name", &self.name)
            .field("locales", &self.locales)
            .finish()
    }
}

/// Builder for [`LocaleRegistry`].
///
/// Duplicate locales are remembered and reported by [`build`](Self::build).
pub struct RegistryBuilder<C> {
    name: String,
    locales: Vec<LocaleId>,
    loaders: HashMap<LocaleId, Loader<C>>,
    duplicate: Option<LocaleId>,
}

impl<C: LocaleContent> RegistryBuilder<C> {
    /// Registers an async closure as the loader for `locale`.
    #[must_use]
    pub fn locale<F, Fut>(self, locale: impl Into<LocaleId>, load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<C>, LoadError>> + Send + 'static,
    {
        let loader: Loader<C> = Arc::new(move || load().boxed());
        self.loader(locale, loader)
    }

    /// Registers content that is already in memory.
    #[must_use]
    pub fn content(self, locale: impl Into<LocaleId>, content: C) -> Self {
        self.locale(locale, move || {
            let content = content.clone();
            async move { Ok(Some(content)) }
        })
    }

    /// Registers a prebuilt loader for `locale`.
    #[must_use]
    pub fn loader(mut self, locale: impl Into<LocaleId>, loader: Loader<C>) -> Self {
        let locale = locale.into();
        if self.loaders.contains_key(&locale) {
            self.duplicate.get_or_insert(locale);
            return self;
        }
        self.locales.push(locale.clone());
        self.loaders.insert(locale, loader);
        self
    }

    /// Finishes the registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateLocale`] naming the first locale
    /// that was registered twice.
    pub fn build(self) -> Result<LocaleRegistry<C>, RegistryError> {
        if let Some(locale) = self.duplicate {
            return Err(RegistryError::DuplicateLocale(locale));
        }
        Ok(LocaleRegistry {
            name: self.name,
            locales: self.locales,
            loaders: self.loaders,
        })
    }
}
