use anyhow::Context;
use clap::Parser;
use hl_core::config::Settings;
use hl_core::time::TimeLocale;
use hl_core::SystemClock;
use hl_inference::models::create_model;
use hl_sources::{HeadlineManager, NewsApiSource, Policy, SourceConfig};
use hl_web::{build_envelope, create_app, AppState};
use std::sync::Arc;
use tracing::{info, warn};

mod duration;
mod logging;

use duration::HumanDuration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Business headlines, optionally rewritten by an LLM", long_about = None)]
pub struct Cli {
    /// Debug logging (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve /api/news and /api/status over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: String,
        #[command(flatten)]
        service: ServiceArgs,
    },
    /// Run a single request cycle and print the response body
    Fetch {
        #[command(flatten)]
        service: ServiceArgs,
    },
    /// Show which environment variables the upstream settings come from
    Config,
}

#[derive(clap::Args, Debug, Clone)]
struct ServiceArgs {
    /// How long a cached list is served without asking upstream (e.g. 30m, 1h15m)
    #[arg(long, default_value = "30m")]
    ttl: HumanDuration,
    /// AI rewrites allowed per UTC day
    #[arg(long, default_value_t = 50)]
    daily_limit: u32,
    /// Headlines per list
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..=10))]
    batch_size: u16,
    #[arg(long, default_value = "business")]
    category: String,
    #[arg(long, default_value = "en")]
    language: String,
    #[arg(long)]
    country: Option<String>,
    /// Language the rewrite service writes in
    #[arg(long, default_value = hl_inference::DEFAULT_TARGET_LANGUAGE)]
    target_language: String,
    /// Upper bound on each upstream call (e.g. 20s)
    #[arg(long, default_value = "20s")]
    timeout: HumanDuration,
    /// Wording for relative times (e.g. en, zh); follows the target language when unset
    #[arg(long)]
    time_locale: Option<String>,
    #[arg(long, default_value = hl_sources::newsapi::DEFAULT_BASE_URL)]
    news_base_url: String,
}

fn build_state(args: &ServiceArgs, settings: &Settings) -> anyhow::Result<AppState> {
    let batch_size = usize::from(args.batch_size);
    let timeout = args.timeout.0;

    if settings.headline_key.is_none() {
        warn!("no headline source API key configured; requests will fail until one is set");
    }

    let source = NewsApiSource::new(SourceConfig {
        api_key: settings.headline_key.as_ref().map(|r| r.value.clone()),
        base_url: args.news_base_url.clone(),
        category: args.category.clone(),
        language: args.language.clone(),
        country: args.country.clone(),
        batch_size,
        timeout,
    })
    .context("invalid headline source configuration")?;

    let inference = hl_inference::Config::from_settings(settings)
        .with_target_language(args.target_language.clone())
        .with_timeout(timeout);
    let rewriter = create_model(&inference).context("invalid rewrite service configuration")?;

    let now = chrono::Utc::now();
    let store = hl_storage::create_store("memory", now)?;

    let policy = Policy {
        ttl: chrono::Duration::from_std(args.ttl.0).context("ttl out of range")?,
        daily_limit: args.daily_limit,
        batch_size,
        upstream_timeout: timeout,
        locale: TimeLocale::for_language(args.time_locale.as_deref().unwrap_or(&args.target_language)),
    };
    info!(?policy, "💾 headline cache ready");

    let manager = HeadlineManager::new(Arc::new(source), rewriter, store, Arc::new(SystemClock), policy);
    Ok(AppState::new(Arc::new(manager), settings.report()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let settings = Settings::from_env();

    match cli.command {
        Commands::Serve { bind, service } => {
            let state = build_state(&service, &settings)?;
            let app = create_app(state);
            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("failed to bind {bind}"))?;
            info!("🌐 serving headlines on http://{}", listener.local_addr()?);
            axum::serve(listener, app).await?;
        }
        Commands::Fetch { service } => {
            let state = build_state(&service, &settings)?;
            let envelope = build_envelope(&state).await;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        Commands::Config => {
            for line in settings.report() {
                println!(
                    "{:<18} {:<20} {:<24} (checked: {})",
                    line.name,
                    line.source.unwrap_or("unset"),
                    line.value.as_deref().unwrap_or("-"),
                    line.candidates.join(", ")
                );
            }
        }
    }

    Ok(())
}
