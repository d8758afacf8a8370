// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core types with ZERO external dependencies.
//!
//! # Modules
//!
//! - [`diagnostics`]: Diagnostics types ([`BufferCapacity`](diagnostics::BufferCapacity))
//! - [`locale`]: Locale identifiers and routing input
//!   ([`LocaleId`](locale::LocaleId), [`RouteLocales`](locale::RouteLocales))

pub mod diagnostics;
pub mod locale;

pub use locale::{LocaleId, RouteLocales};
