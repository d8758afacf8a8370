// SPDX-License-Identifier: MPL-2.0
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use route_i18n::config::{self, DEFAULT_LOCALE};
use route_i18n::diagnostics::{FanoutSink, TracingSink};
use route_i18n::error::{Error, Result};
use route_i18n::i18n::{embedded_messages, embedded_registry};
use route_i18n::provider::LocaleProvider;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "usage: route_i18n [--lang ID] [--config-dir DIR] [KEY...]";
const DEFAULT_KEYS: &[&str] = &["app-title", "locale-name"];

struct Flags {
    lang: Option<String>,
    config_dir: Option<PathBuf>,
    keys: Vec<String>,
}

fn parse_flags() -> std::result::Result<Option<Flags>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let lang = args.opt_value_from_str("--lang")?;
    let config_dir = args.opt_value_from_str("--config-dir")?;
    let keys = args
        .finish()
        .into_iter()
        .filter_map(|arg| arg.into_string().ok())
        .collect();

    Ok(Some(Flags {
        lang,
        config_dir,
        keys,
    }))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

async fn run(flags: Flags) -> Result<()> {
    let (config, warning) = config::load_with_override(flags.config_dir);
    if let Some(warning) = warning {
        tracing::warn!("{warning}");
    }
    let routing = &config.routing;

    let default_locale = routing
        .default_locale
        .clone()
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
    let static_content = embedded_messages(&default_locale)?;
    let registry = Arc::new(embedded_registry("messages")?);

    let recorder = Arc::new(config.diagnostics.recording_sink());
    let sink = FanoutSink::new()
        .with(Arc::new(TracingSink))
        .with(recorder.clone());
    let mut provider = LocaleProvider::new(registry, static_content, Arc::new(sink))
        .with_route_source(routing.source_name.clone());

    let requested = flags
        .lang
        .or_else(sys_locale::get_locale)
        .unwrap_or(default_locale);
    tracing::debug!(%requested, "resolving");

    if let Some(pending) = provider.update(routing.route(requested)) {
        pending.run().await?;
    }

    let render = provider.render();
    if !recorder.is_empty() {
        eprintln!(
            "{} configuration warning(s), last {} kept",
            recorder.len(),
            config.diagnostics.capacity()
        );
    }
    let messages = render.content().ok_or_else(|| {
        Error::Config("routing settings are incomplete; nothing to render".to_string())
    })?;

    println!("locale: {}", messages.locale());
    if flags.keys.is_empty() {
        for key in DEFAULT_KEYS {
            println!("{key} = {}", messages.tr(key));
        }
    } else {
        for key in &flags.keys {
            println!("{key} = {}", messages.tr(key));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let flags = match parse_flags() {
        Ok(Some(flags)) => flags,
        Ok(None) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("route_i18n: {err}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("route_i18n: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(flags)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("route_i18n: {err}");
            ExitCode::FAILURE
        }
    }
}
