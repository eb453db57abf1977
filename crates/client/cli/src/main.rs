//! Command-line entry point: loads content, auto-plays one encounter and
//! prints what happened.
mod config;
mod report;

use anyhow::{Context, Result};
use combat_content::ContentFactory;
use runtime::{AutoPlayProvider, Runtime, RuntimeConfig, Topic};
use tokio::sync::broadcast::error::RecvError;

use config::CliConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let config = CliConfig::from_env();
    let factory = match &config.content_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    };
    let bundle = factory
        .load_bundle()
        .with_context(|| format!("loading content from {}", factory.data_dir().display()))?;

    for warning in &bundle.warnings {
        tracing::warn!("content warning: {warning}");
    }

    let enemy = match config.enemy.clone() {
        Some(enemy) => enemy,
        None => bundle
            .catalog
            .enemy_ids()
            .into_iter()
            .next()
            .context("content defines no enemies")?,
    };

    let mut builder = Runtime::builder()
        .config(RuntimeConfig {
            seed: config.seed,
            max_rounds: config.max_rounds,
            ..RuntimeConfig::default()
        })
        .content(bundle)
        .enemy(enemy)
        .player_provider(AutoPlayProvider);
    if let Some(path) = &config.journal {
        builder = builder.journal(path);
    }
    let mut runtime = builder.build().await?;

    let printer = (!config.json).then(|| spawn_printer(&runtime));

    let summary = runtime.run().await?;
    runtime.shutdown().await?;
    if let Some(printer) = printer {
        printer.await?;
    }

    if config.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", report::summary(&summary));
    }

    Ok(())
}

/// Prints combat and lifecycle events as they happen.
fn spawn_printer(runtime: &Runtime) -> tokio::task::JoinHandle<()> {
    let mut combat = runtime.subscribe(Topic::Combat);
    let mut lifecycle = runtime.subscribe(Topic::Lifecycle);

    tokio::spawn(async move {
        let mut combat_open = true;
        let mut lifecycle_open = true;

        while combat_open || lifecycle_open {
            let received = tokio::select! {
                biased;
                event = lifecycle.recv(), if lifecycle_open => (Topic::Lifecycle, event),
                event = combat.recv(), if combat_open => (Topic::Combat, event),
            };
            match received {
                (_, Ok(event)) => {
                    if let Some(line) = report::describe(&event) {
                        println!("{line}");
                    }
                }
                (_, Err(RecvError::Lagged(skipped))) => {
                    tracing::warn!(skipped, "event printer lagged");
                }
                (Topic::Combat, Err(RecvError::Closed)) => combat_open = false,
                (Topic::Lifecycle, Err(RecvError::Closed)) => lifecycle_open = false,
            }
        }
    })
}

/// Logs go to stderr so stdout stays clean for the report.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
