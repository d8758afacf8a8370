// SPDX-License-Identifier: MPL-2.0
//! Fluent-backed locale content.
//!
//! [`Messages`] is the concrete content type the demo binary and the
//! integration tests resolve. Translation files ship inside the binary
//! under `assets/i18n/<locale>.ftl`.

pub mod fluent;

pub use fluent::{embedded_locales, embedded_messages, embedded_registry, Messages};
