// SPDX-License-Identifier: MPL-2.0
use std::sync::Arc;

use route_i18n::config::{self, Config, RoutingConfig};
use route_i18n::diagnostics::{FanoutSink, RecordingSink, TracingSink};
use route_i18n::domain::RouteLocales;
use route_i18n::error::{LoadError, ResolveError};
use route_i18n::i18n::{embedded_messages, embedded_registry, Messages};
use route_i18n::provider::{LocaleProvider, Outcome, ProviderState, Render};
use route_i18n::registry::LocaleRegistry;
use tempfile::tempdir;
use tokio::sync::Semaphore;

fn embedded_provider(
    routing: &RoutingConfig,
    sink: Arc<RecordingSink>,
) -> LocaleProvider<Messages> {
    let registry = embedded_registry("messages").expect("embedded registry");
    let static_content = embedded_messages("en").expect("en is embedded");
    LocaleProvider::new(Arc::new(registry), static_content, sink)
        .with_route_source(routing.source_name.clone())
}

/// Registry whose loaders each wait for a permit on their own semaphore.
fn gated_registry(locales: &[(&'static str, Arc<Semaphore>)]) -> LocaleRegistry<String> {
    let mut builder = LocaleRegistry::builder("messages");
    for (locale, gate) in locales {
        let gate = Arc::clone(gate);
        let text = format!("content:{locale}");
        builder = builder.locale(*locale, move || {
            let gate = Arc::clone(&gate);
            let text = text.clone();
            async move {
                let permit = gate.acquire().await.map_err(LoadError::failed)?;
                permit.forget();
                Ok(Some(text))
            }
        });
    }
    builder.build().expect("unique locales")
}

#[tokio::test]
async fn config_on_disk_drives_embedded_resolution() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let base_dir = dir.path().to_path_buf();
    config::save_with_override(&Config::default(), Some(base_dir.clone()))
        .expect("Failed to write config file");

    let (config, warning) = config::load_with_override(Some(base_dir));
    assert!(warning.is_none());

    let sink = Arc::new(RecordingSink::default());
    let mut provider = embedded_provider(&config.routing, Arc::clone(&sink));

    let outcome = provider
        .update_and_resolve(config.routing.route("fr"))
        .await
        .expect("fr is embedded");

    assert_eq!(outcome, Some(Outcome::Applied));
    let render = provider.render();
    let messages = render.content().expect("routing is complete");
    assert_eq!(messages.tr("locale-name"), "Français");
    assert!(sink.is_empty(), "default config matches the embedded locales");
}

#[tokio::test]
async fn unknown_request_falls_back_to_default_locale() {
    let routing = RoutingConfig {
        default_locale: Some("de".to_string()),
        ..RoutingConfig::default()
    };
    let sink = Arc::new(RecordingSink::default());
    let mut provider = embedded_provider(&routing, sink);

    provider
        .update_and_resolve(routing.route("pt-BR"))
        .await
        .expect("de is embedded");

    match provider.state() {
        ProviderState::Loaded { locale, content } => {
            assert_eq!(locale.as_str(), "de");
            assert_eq!(content.tr("locale-name"), "Deutsch");
        }
        ProviderState::Static(_) => panic!("expected loaded content"),
    }
}

#[tokio::test]
async fn declared_locales_are_reconciled_against_the_registry() {
    let dir = tempdir().expect("Failed to create temporary directory");
    std::fs::write(
        dir.path().join("route_i18n.toml"),
        "[routing]\nlocales = [\"en\", \"fr\", \"it\"]\nsource_name = \"router\"\n",
    )
    .expect("write config");

    let (config, warning) = config::load_with_override(Some(dir.path().to_path_buf()));
    assert!(warning.is_none());

    let sink = Arc::new(RecordingSink::default());
    let mut provider = embedded_provider(&config.routing, Arc::clone(&sink));
    provider
        .update_and_resolve(config.routing.route("en"))
        .await
        .expect("en is embedded");

    assert_eq!(
        sink.messages(),
        vec![
            "The following locales are defined in 'messages' but not in 'router': de",
            "The following locales are defined in 'router' but not in 'messages': it",
        ]
    );
}

#[tokio::test]
async fn missing_locale_everywhere_keeps_static_content() {
    let sink = Arc::new(RecordingSink::default());
    let routing = RoutingConfig::default();
    let mut provider = embedded_provider(&routing, sink);

    let result = provider
        .update_and_resolve(RouteLocales::new("xx", "yy", ["de", "en", "fr"]))
        .await;

    assert!(matches!(result, Err(ResolveError::LocaleNotFound { .. })));
    match provider.render() {
        Render::Static(messages) => assert_eq!(messages.locale().as_str(), "en"),
        other => panic!("expected static content, got {:?}", other.is_suppressed()),
    }
}

#[tokio::test]
async fn incomplete_routing_suppresses_rendering() {
    let routing = RoutingConfig {
        default_locale: Some(String::new()),
        ..RoutingConfig::default()
    };
    let sink = Arc::new(RecordingSink::default());
    let mut provider = embedded_provider(&routing, Arc::clone(&sink));

    assert!(provider.update(routing.route("fr")).is_none());
    assert!(provider.render().is_suppressed());
    assert_eq!(sink.count("'defaultLocale' not defined"), 1);
}

#[tokio::test]
async fn late_completion_of_superseded_request_is_discarded() {
    let fr_gate = Arc::new(Semaphore::new(0));
    let de_gate = Arc::new(Semaphore::new(0));
    let registry = gated_registry(&[
        ("en", Arc::new(Semaphore::new(0))),
        ("fr", Arc::clone(&fr_gate)),
        ("de", Arc::clone(&de_gate)),
    ]);
    let sink = Arc::new(RecordingSink::default());
    let mut provider = LocaleProvider::new(Arc::new(registry), "static".to_string(), sink);
    let mut updates = provider.subscribe();

    let first = provider
        .update(RouteLocales::new("fr", "en", ["en", "fr", "de"]))
        .expect("fr resolution starts")
        .spawn();
    let second = provider
        .update(RouteLocales::new("de", "en", ["en", "fr", "de"]))
        .expect("de resolution starts")
        .spawn();

    de_gate.add_permits(1);
    let second = second.await.expect("task completes");
    assert_eq!(second, Ok(Outcome::Applied));

    fr_gate.add_permits(1);
    let first = first.await.expect("task completes");
    assert_eq!(first, Ok(Outcome::Superseded));

    assert!(updates.has_changed().expect("provider alive"));
    assert_eq!(provider.render(), Render::Loaded("content:de".to_string()));
    assert_eq!(updates.borrow_and_update().content(), "content:de");
}

#[tokio::test]
async fn teardown_makes_in_flight_resolution_inert() {
    let fr_gate = Arc::new(Semaphore::new(0));
    let registry = gated_registry(&[
        ("en", Arc::new(Semaphore::new(0))),
        ("fr", Arc::clone(&fr_gate)),
    ]);
    let sink = Arc::new(RecordingSink::default());
    let mut provider = LocaleProvider::new(Arc::new(registry), "static".to_string(), sink);
    let updates = provider.subscribe();

    let pending = provider
        .update(RouteLocales::new("fr", "en", ["en", "fr"]))
        .expect("fr resolution starts");
    drop(provider);

    fr_gate.add_permits(1);
    assert_eq!(pending.run().await, Ok(Outcome::Superseded));
    assert_eq!(updates.borrow().content(), "static");
}

#[tokio::test]
async fn configured_capacity_limits_recorded_provider_warnings() {
    let dir = tempdir().expect("Failed to create temporary directory");
    std::fs::write(
        dir.path().join("route_i18n.toml"),
        "[routing]\ndefault_locale = \"\"\n\n[diagnostics]\ncapacity = 16\n",
    )
    .expect("write config");
    let (config, warning) = config::load_with_override(Some(dir.path().to_path_buf()));
    assert!(warning.is_none());

    let recorder = Arc::new(config.diagnostics.recording_sink());
    let sink = FanoutSink::new()
        .with(Arc::new(TracingSink))
        .with(recorder.clone());
    let registry = embedded_registry("messages").expect("embedded registry");
    let static_content = embedded_messages("en").expect("en is embedded");
    let mut provider = LocaleProvider::new(Arc::new(registry), static_content, Arc::new(sink));

    assert!(provider.update(config.routing.route("fr")).is_none());
    for _ in 0..40 {
        assert!(provider.render().is_suppressed());
    }

    assert_eq!(recorder.len(), 16);
    assert_eq!(recorder.count("'defaultLocale' not defined"), 16);
}
