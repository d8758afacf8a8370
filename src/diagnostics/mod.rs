// SPDX-License-Identifier: MPL-2.0
//! Configuration diagnostics.
//!
//! Diagnostics never abort the user-visible flow. They are turned into
//! warning strings and handed to a [`LogSink`].
//!
//! # Architecture
//!
//! - [`reconcile`]: Compares the registry's locales with the routing layer's
//! - [`Diagnostic`]: Everything the provider can warn about
//! - [`LogSink`]: Where warnings go ([`TracingSink`], [`RecordingSink`])
//! - [`CircularBuffer`]: Bounded storage behind [`RecordingSink`]

mod buffer;
mod reconcile;
mod sink;

use std::fmt;

pub use buffer::CircularBuffer;
pub use reconcile::{reconcile, ConfigMismatch, LocaleSource};
pub use sink::{FanoutSink, LogSink, RecordingSink, TracingSink};

/// Required routing setting that was not provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingSetting {
    DefaultLocale,
    Locales,
}

impl fmt::Display for MissingSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingSetting::DefaultLocale => f.write_str("'defaultLocale' not defined"),
            MissingSetting::Locales => f.write_str("'locales' not defined"),
        }
    }
}

/// A non-fatal configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The registry and the routing layer disagree on the locale set.
    ConfigMismatch(ConfigMismatch),
    /// The routing layer omitted a required setting; rendering is suppressed.
    ConfigIncomplete(MissingSetting),
}

impl Diagnostic {
    /// Renders the diagnostic and hands it to `sink`.
    pub fn report(&self, sink: &dyn LogSink) {
        sink.emit(&self.to_string());
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ConfigMismatch(mismatch) => fmt::Display::fmt(mismatch, f),
            Diagnostic::ConfigIncomplete(setting) => fmt::Display::fmt(setting, f),
        }
    }
}

impl From<ConfigMismatch> for Diagnostic {
    fn from(mismatch: ConfigMismatch) -> Self {
        Diagnostic::ConfigMismatch(mismatch)
    }
}

impl From<MissingSetting> for Diagnostic {
    fn from(setting: MissingSetting) -> Self {
        Diagnostic::ConfigIncomplete(setting)
    }
}
