// SPDX-License-Identifier: MPL-2.0
//! Locale identifiers and the per-request routing input.

use std::borrow::Borrow;
use std::fmt;

// =============================================================================
// LocaleId
// =============================================================================

/// Opaque identifier of one locale (e.g. `"en"`, `"fr"`).
///
/// Equality is an exact string match. No case folding or region
/// normalization is ever applied, so `"en-US"` and `"en-us"` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocaleId(String);

impl LocaleId {
    /// Creates a locale identifier from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocaleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for LocaleId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for LocaleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LocaleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// RouteLocales
// =============================================================================

/// Locale settings supplied by the host routing layer for one render.
///
/// Any field may be missing when the routing layer is misconfigured.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteLocales {
    /// Locale requested for the current route.
    pub locale: Option<LocaleId>,
    /// Locale used when the requested one has no content.
    pub default_locale: Option<LocaleId>,
    /// Every locale the routing layer declares.
    pub locales: Option<Vec<LocaleId>>,
}

impl RouteLocales {
    /// Creates a fully specified routing input.
    #[must_use]
    pub fn new(
        locale: impl Into<LocaleId>,
        default_locale: impl Into<LocaleId>,
        locales: impl IntoIterator<Item = impl Into<LocaleId>>,
    ) -> Self {
        Self {
            locale: Some(locale.into()),
            default_locale: Some(default_locale.into()),
            locales: Some(locales.into_iter().map(Into::into).collect()),
        }
    }

    /// Returns the `(requested, default)` pair that drives resolution.
    #[must_use]
    pub fn pair(&self) -> (Option<&LocaleId>, Option<&LocaleId>) {
        (self.locale.as_ref(), self.default_locale.as_ref())
    }
}
