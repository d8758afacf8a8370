// SPDX-License-Identifier: MPL-2.0
//! Reconciliation of two independently declared locale sets.
//!
//! The registry and the routing layer each declare which locales exist.
//! [`reconcile`] compares them in both directions and reports every locale
//! one side knows about and the other does not. The result is diagnostic
//! only; nothing here blocks rendering or resolution.

use std::collections::HashSet;
use std::fmt;

use crate::domain::LocaleId;

/// One named side of a reconciliation.
#[derive(Debug, Clone, Copy)]
pub struct LocaleSource<'a> {
    name: &'a str,
    locales: &'a [LocaleId],
}

impl<'a> LocaleSource<'a> {
    /// Creates a source. A missing locale list is treated as empty.
    #[must_use]
    pub fn new(name: &'a str, locales: Option<&'a [LocaleId]>) -> Self {
        Self {
            name,
            locales: locales.unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    #[must_use]
    pub fn locales(&self) -> &'a [LocaleId] {
        self.locales
    }
}

/// Locales present in one source but absent from another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigMismatch {
    /// Source that declares the locales.
    pub defined_in: String,
    /// Source that lacks them.
    pub missing_from: String,
    /// Missing locales, in the declaring source's order.
    pub locales: Vec<LocaleId>,
}

impl fmt::Display for ConfigMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The following locales are defined in '{}' but not in '{}': ",
            self.defined_in, self.missing_from
        )?;
        for (index, locale) in self.locales.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            f.write_str(locale.as_str())?;
        }
        Ok(())
    }
}

/// Compares two locale sources and returns one mismatch per non-empty
/// set difference: `a - b` first, then `b - a`.
///
/// # Example
///
/// ```
/// use route_i18n::diagnostics::{reconcile, LocaleSource};
/// use route_i18n::domain::LocaleId;
///
/// let registry = [LocaleId::from("en"), LocaleId::from("fr")];
/// let routing = [LocaleId::from("en"), LocaleId::from("de")];
///
/// let mismatches = reconcile(
///     LocaleSource::new("registry", Some(&registry)),
///     LocaleSource::new("routing", Some(&routing)),
/// );
///
/// assert_eq!(mismatches.len(), 2);
/// assert_eq!(
///     mismatches[0].to_string(),
///     "The following locales are defined in 'registry' but not in 'routing': fr"
/// );
/// ```
#[must_use]
pub fn reconcile(a: LocaleSource<'_>, b: LocaleSource<'_>) -> Vec<ConfigMismatch> {
    [difference(a, b), difference(b, a)]
        .into_iter()
        .flatten()
        .collect()
}

fn difference(from: LocaleSource<'_>, other: LocaleSource<'_>) -> Option<ConfigMismatch> {
    let present: HashSet<&LocaleId> = other.locales.iter().collect();
    let mut seen = HashSet::new();
    let missing: Vec<LocaleId> = from
        .locales
        .iter()
        .filter(|locale| !present.contains(locale) && seen.insert(*locale))
        .cloned()
        .collect();

    if missing.is_empty() {
        return None;
    }

    Some(ConfigMismatch {
        defined_in: from.name.to_string(),
        missing_from: other.name.to_string(),
        locales: missing,
    })
}
