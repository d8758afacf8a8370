// SPDX-License-Identifier: MPL-2.0
//! Default values for configuration settings.

// ==========================================================================
// Routing Defaults
// ==========================================================================

/// Locale used when the requested one has no content.
pub const DEFAULT_LOCALE: &str = "en";

/// Locales the routing layer declares when the config names none.
pub const DEFAULT_LOCALES: &[&str] = &["de", "en", "fr"];

pub use crate::provider::DEFAULT_ROUTE_SOURCE;

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Number of warnings a recording sink keeps.
pub const DEFAULT_DIAGNOSTICS_CAPACITY: usize =
    crate::domain::diagnostics::BufferCapacity::DEFAULT;
