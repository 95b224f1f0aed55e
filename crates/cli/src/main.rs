//! VegOre CLI - browse the storefront and place orders from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Diet plans, newest first, optionally by category
//! vegore plans --category weight-loss
//!
//! # Health articles, most recently published first
//! vegore articles --category nutrition
//!
//! # One article in full
//! vegore article <ARTICLE_ID>
//!
//! # The home view's featured plans and articles
//! vegore featured
//!
//! # Place an order
//! vegore order --plan <PLAN_ID> --name "Jane Doe" --email jane@example.com
//! ```
//!
//! # Environment Variables
//!
//! See `vegore_storefront::config` for the full list; `SUPABASE_URL` and
//! `SUPABASE_ANON_KEY` are required.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vegore_core::{ArticleCategory, ArticleId, CategoryFilter, DietPlanId, PlanCategory};
use vegore_storefront::config::StorefrontConfig;
use vegore_storefront::{AppError, Storefront};

mod commands;

#[derive(Parser)]
#[command(name = "vegore")]
#[command(author, version, about = "VegOre storefront from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List diet plans, newest first
    Plans {
        /// Category to show (`all`, `balanced`, `weight-loss`, `muscle-gain`,
        /// `vegan`, `keto`, `beginner`)
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter<PlanCategory>,
    },
    /// List health articles, most recently published first
    Articles {
        /// Category to show (`all`, `nutrition`, `fitness`, `wellness`)
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter<ArticleCategory>,
    },
    /// Show one health article in full
    Article {
        /// Article ID
        id: ArticleId,
    },
    /// Show the home view's featured plans and articles
    Featured,
    /// Order a diet plan
    Order {
        /// Plan ID
        #[arg(short, long)]
        plan: DietPlanId,

        /// Your full name
        #[arg(short, long)]
        name: String,

        /// Your email address
        #[arg(short, long)]
        email: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vegore_storefront=info,vegore_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Configuration is needed before Sentry, and Sentry before tracing
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => return fail(&AppError::from(e)),
    };
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let result = match Storefront::new(&config) {
        Ok(store) => run(&store, cli.command).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            fail(&e)
        }
    }
}

async fn run(store: &Storefront, command: Commands) -> Result<(), AppError> {
    match command {
        Commands::Plans { category } => {
            commands::catalog::plans(store, &category).await;
            Ok(())
        }
        Commands::Articles { category } => {
            commands::catalog::articles(store, &category).await;
            Ok(())
        }
        Commands::Article { id } => commands::catalog::article(store, id).await,
        Commands::Featured => {
            commands::catalog::featured(store).await;
            Ok(())
        }
        Commands::Order { plan, name, email } => {
            commands::order::place(store, plan, &name, &email).await
        }
    }
}

#[allow(clippy::print_stderr)]
fn fail(error: &AppError) -> ExitCode {
    eprintln!("Error: {}", error.user_message());
    ExitCode::FAILURE
}
