// SPDX-License-Identifier: MPL-2.0
//! `route_i18n` resolves per-route locale content for a rendering tree.
//!
//! A [`registry::LocaleRegistry`] maps locale ids to asynchronous loaders.
//! A [`provider::LocaleProvider`] receives the routing layer's locale
//! settings, reconciles them against the registry, resolves the requested
//! locale (falling back to the default) and publishes the result to
//! subscribers. Stale resolutions never overwrite newer ones.
//!
//! [`i18n::Messages`] is a Fluent-backed content type with embedded
//! translations; any `Clone + Send + Sync` type works as content.

#![doc(html_root_url = "https://docs.rs/route_i18n/0.1.0")]

pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod provider;
pub mod registry;
pub mod resolver;

#[cfg(test)]
pub(crate) mod test_utils;
