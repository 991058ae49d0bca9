//! Remit CLI
//!
//! Command-line driver for the remittance conversion engine:
//! - Load configuration from environment (and `.env`)
//! - Build the provider chain and the conversion engine
//! - Run a single rate lookup, quote or booking

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exchange_rates::{KnownCurrency, RateResolver};
use rates_client::{FrankfurterProvider, OpenErApiProvider};
use remit_engine::{ConversionEngine, EngineConfig};
use remit_types::{CurrencyCode, CurrencyPair, CurrencySubscriber, Payer, RatePair};

#[derive(Parser)]
#[command(name = "remit")]
#[command(author, version, about = "Remittance quote and booking CLI", long_about = None)]
struct Cli {
    /// Primary rate endpoint
    #[arg(long, global = true, env = "REMIT_PRIMARY_FX_URL")]
    primary_url: Option<String>,

    /// Secondary rate endpoint
    #[arg(long, global = true, env = "REMIT_SECONDARY_FX_URL")]
    secondary_url: Option<String>,

    /// Skip the HTTP providers and use only the static table
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum PayerArg {
    Sender,
    Recipient,
}

impl From<PayerArg> for Payer {
    fn from(arg: PayerArg) -> Self {
        match arg {
            PayerArg::Sender => Payer::Sender,
            PayerArg::Recipient => Payer::Recipient,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single exchange rate
    Rate {
        #[arg(long)]
        from: String,
        #[arg(long, default_value = "INR")]
        to: String,
    },
    /// Quote a transfer into the settlement currency
    Quote {
        /// Amount to send (thousands separators allowed)
        #[arg(long)]
        amount: String,
        /// Currency the amount is sent in
        #[arg(long, default_value = "USD")]
        currency: String,
        /// Bank fee in USD (overrides REMIT_FEE_USD)
        #[arg(long)]
        fee_usd: Option<f64>,
        #[arg(long, value_enum, default_value = "sender")]
        payer: PayerArg,
    },
    /// Validate a transfer and print the booking payload
    Book {
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "USD")]
        currency: String,
        /// Receiving amount; mirrors --amount when omitted
        #[arg(long)]
        receiving: Option<String>,
        #[arg(long)]
        fee_usd: Option<f64>,
        #[arg(long, value_enum, default_value = "sender")]
        payer: PayerArg,
    },
    /// List currencies with static approximations
    Currencies,
}

/// Logs every pair the engine publishes.
struct PairLogger;

impl CurrencySubscriber for PairLogger {
    fn on_pair_changed(&self, pair: &CurrencyPair) {
        tracing::debug!(base = %pair.base, quote = %pair.quote, "Currency controls synced");
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,remit_engine=debug,exchange_rates=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_resolver(cli: &Cli, config: &config::Config) -> RateResolver {
    let mut builder = RateResolver::builder();
    if !cli.offline {
        let primary = cli.primary_url.as_deref().unwrap_or(&config.primary_fx_url);
        let secondary = cli
            .secondary_url
            .as_deref()
            .unwrap_or(&config.secondary_fx_url);
        builder = builder
            .provider(Arc::new(FrankfurterProvider::new(primary)))
            .provider(Arc::new(OpenErApiProvider::new(secondary)));
    }
    builder.with_static_fallback().build()
}

async fn build_engine(
    resolver: RateResolver,
    config: &config::Config,
    currency: &str,
    fee_usd: Option<f64>,
) -> Result<ConversionEngine> {
    let engine_config = EngineConfig {
        base: CurrencyCode::new(&config.base_currency).context("invalid REMIT_BASE_CURRENCY")?,
        fee_usd: fee_usd.unwrap_or(config.fee_usd),
        seed_rate: config.seed_rate,
        ..EngineConfig::default()
    };
    let engine = ConversionEngine::new(Arc::new(resolver), engine_config);
    engine.subscribe(Arc::new(PairLogger));

    if let Err(e) = engine.set_quote_currency(currency).await {
        // The engine keeps its last known rate; only an invalid code is fatal.
        if matches!(e, remit_types::EngineError::InvalidCurrencyPair) {
            return Err(e.into());
        }
        eprintln!("warning: {}; using last known rate", e);
    }
    Ok(engine)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = config::Config::from_env()?;
    let resolver = build_resolver(&cli, &config);

    match cli.command {
        Commands::Rate { ref from, ref to } => {
            let pair = RatePair::parse(from, to)?;
            let resolved = resolver.resolve_pair(&pair).await?;
            println!(
                "1 {} = {} {} (source: {})",
                resolved.pair.from, resolved.rate, resolved.pair.to, resolved.source
            );
        }

        Commands::Quote {
            ref amount,
            ref currency,
            fee_usd,
            payer,
        } => {
            let engine = build_engine(resolver, &config, currency, fee_usd).await?;
            engine.set_payer(payer.into());
            let snapshot = engine.set_amount_to_send(amount);
            let output = serde_json::json!({
                "pair": snapshot.pair,
                "rate": snapshot.rate_label(),
                "inputs": snapshot.inputs,
                "display": snapshot.displayed(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Commands::Book {
            ref amount,
            ref currency,
            ref receiving,
            fee_usd,
            payer,
        } => {
            let engine = build_engine(resolver, &config, currency, fee_usd).await?;
            engine.set_payer(payer.into());
            engine.set_amount_to_send(amount);
            if let Some(receiving) = receiving {
                engine.set_receiving_amount(receiving);
            }

            match engine.book(chrono::Utc::now()) {
                Ok(payload) => {
                    println!("Order booked successfully!");
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                Err(e) => {
                    for message in e.messages() {
                        eprintln!("✗ {}", message);
                    }
                    std::process::exit(1);
                }
            }
        }

        Commands::Currencies => {
            for currency in KnownCurrency::all() {
                println!(
                    "{}  {:<3} {}",
                    currency.code(),
                    currency.symbol(),
                    currency.display_name()
                );
            }
        }
    }

    Ok(())
}
