// SPDX-License-Identifier: MPL-2.0
//! Error types for configuration, registry construction and content resolution.

use crate::domain::LocaleId;
use thiserror::Error;

/// Crate-wide error.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("Content Error: {0}")]
    Content(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Failure reported by a locale content loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The loader ran but could not produce content.
    #[error("{0}")]
    Failed(String),

    /// The loader completed with no content at all.
    #[error("loader produced no content")]
    Empty,
}

impl LoadError {
    /// Wraps any displayable failure.
    pub fn failed(reason: impl std::fmt::Display) -> Self {
        LoadError::Failed(reason.to_string())
    }
}

/// Failure of one resolution attempt.
///
/// A failed attempt never touches the provider state; the previously
/// visible content stays in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Neither the requested nor the fallback locale has a loader.
    #[error("no locale content registered for '{requested}' (fallback '{fallback}')")]
    LocaleNotFound {
        requested: LocaleId,
        fallback: LocaleId,
    },

    /// The chosen loader failed or returned an empty payload.
    #[error("failed to load locale content for '{locale}': {source}")]
    LoaderFailure {
        locale: LocaleId,
        #[source]
        source: LoadError,
    },
}

/// Invalid registry declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("locale '{0}' is registered more than once")]
    DuplicateLocale(LocaleId),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
