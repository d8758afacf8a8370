// SPDX-License-Identifier: MPL-2.0
use std::fmt;
use std::sync::Arc;

use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use rust_embed::RustEmbed;
use unic_langid::LanguageIdentifier;

use crate::domain::LocaleId;
use crate::error::{Error, LoadError, Result};
use crate::registry::LocaleRegistry;

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

/// Translated messages for one locale.
///
/// Cloning is cheap; the parsed bundle is shared.
#[derive(Clone)]
pub struct Messages {
    locale: LocaleId,
    entries: usize,
    bundle: Arc<FluentBundle<FluentResource>>,
}

impl Messages {
    /// Parses Fluent source for `locale`.
    ///
    /// The bundle's language is parsed from the locale id; ids that are not
    /// valid language tags get the undetermined language, the `LocaleId`
    /// itself is kept as given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Content`] if the source has syntax errors or defines
    /// a message twice.
    pub fn parse(locale: impl Into<LocaleId>, source: impl Into<String>) -> Result<Self> {
        let locale = locale.into();
        let resource = FluentResource::try_new(source.into()).map_err(|(_, errors)| {
            Error::Content(format!("{locale}: {} syntax error(s)", errors.len()))
        })?;
        let entries = resource.entries().count();

        let language = locale
            .as_str()
            .parse::<LanguageIdentifier>()
            .unwrap_or_default();
        let mut bundle = FluentBundle::new_concurrent(vec![language]);
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).map_err(|errors| {
            Error::Content(format!("{locale}: {} conflicting message(s)", errors.len()))
        })?;

        Ok(Self {
            locale,
            entries,
            bundle: Arc::new(bundle),
        })
    }

    #[must_use]
    pub fn locale(&self) -> &LocaleId {
        &self.locale
    }

    /// True when the source had no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.bundle.has_message(key)
    }

    /// Formats `key`, or returns `MISSING: <key>`.
    #[must_use]
    pub fn tr(&self, key: &str) -> String {
        self.tr_with_args(key, None)
    }

    #[must_use]
    pub fn tr_with_args(&self, key: &str, args: Option<&FluentArgs>) -> String {
        if let Some(msg) = self.bundle.get_message(key) {
            if let Some(pattern) = msg.value() {
                let mut errors = vec![];
                let value = self.bundle.format_pattern(pattern, args, &mut errors);
                if errors.is_empty() {
                    return value.to_string();
                }
            }
        }
        format!("MISSING: {}", key)
    }
}

impl fmt::Debug for Messages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messages")
            .field("locale", &self.locale)
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

/// Locales shipped in `assets/i18n/`, sorted by id.
#[must_use]
pub fn embedded_locales() -> Vec<LocaleId> {
    let mut locales: Vec<LocaleId> = Asset::iter()
        .filter_map(|file| file.strip_suffix(".ftl").map(LocaleId::from))
        .collect();
    locales.sort();
    locales
}

/// Builds a registry whose loaders read the embedded `.ftl` files.
///
/// # Errors
///
/// Returns [`Error::Registry`] if two assets map to the same locale.
pub fn embedded_registry(name: impl Into<String>) -> Result<LocaleRegistry<Messages>> {
    let mut builder = LocaleRegistry::builder(name);
    for locale in embedded_locales() {
        let id = locale.clone();
        builder = builder.locale(locale, move || {
            let id = id.clone();
            async move { load_embedded(&id).map_err(LoadError::failed) }
        });
    }
    Ok(builder.build()?)
}

/// Loads one embedded locale synchronously, for use as static content.
///
/// # Errors
///
/// Returns [`Error::Content`] if the locale is not embedded, is empty or
/// fails to parse.
pub fn embedded_messages(locale: &str) -> Result<Messages> {
    load_embedded(&LocaleId::from(locale))?
        .ok_or_else(|| Error::Content(format!("no embedded messages for '{locale}'")))
}

fn load_embedded(locale: &LocaleId) -> Result<Option<Messages>> {
    let Some(file) = Asset::get(&format!("{locale}.ftl")) else {
        return Ok(None);
    };
    let source = String::from_utf8_lossy(file.data.as_ref()).into_owned();
    let messages = Messages::parse(locale.clone(), source)?;
    Ok((!messages.is_empty()).then_some(messages))
}
