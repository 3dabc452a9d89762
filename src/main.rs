//! Bagquote CLI

use std::{
    io::{self, Write as _},
    process::ExitCode,
};

use bagquote::{
    config::{
        CheckArgs, Command, Config, InteractiveArgs, LadderArgs, QuoteArgs, parse_quantity,
    },
    fixtures::{Fixture, FixtureError, YamlRuleSource},
    pricing::{PriceInput, calculate_price, price_ladder},
    products::Product,
    quote::{QuoteError, QuoteRenderer},
    store::{CachedRuleStore, RuleSourceError},
};
use jiff::{SignedDuration, Timestamp};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Rules(#[from] RuleSourceError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(error) => {
            // Help and version requests also arrive here.
            _ = error.print();

            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "bagquote failed");

            #[expect(
                clippy::print_stderr,
                reason = "the error must reach the user even when logging is filtered"
            )]
            {
                eprintln!("Error: {error}");
            }

            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), CliError> {
    let mut fixture = Fixture::with_base_path(&config.fixtures);
    fixture.load_products(&config.set)?;

    let store = CachedRuleStore::with_ttl(
        YamlRuleSource::new(fixture.rules_path(&config.set)),
        SignedDuration::from_secs(config.cache_ttl_secs),
    );
    let renderer = QuoteRenderer::new(fixture.currency()?);

    info!(set = %config.set, fixtures = %config.fixtures.display(), "loaded fixtures");

    match config.command {
        Command::Quote(args) => quote(&fixture, &store, renderer, &args).await,
        Command::Ladder(args) => ladder(&fixture, &store, renderer, &args).await,
        Command::Check(args) => check(&store, renderer, &args).await,
        Command::Interactive(args) => interactive(&fixture, &store, renderer, &args).await,
    }
}

async fn quote(
    fixture: &Fixture,
    store: &CachedRuleStore<YamlRuleSource>,
    renderer: QuoteRenderer,
    args: &QuoteArgs,
) -> Result<(), CliError> {
    let product = fixture.product(&args.product)?;
    let rules = store.snapshot(Timestamp::now()).await?;
    let input = order_line(product, args.quantity, args.colors, args.size.as_deref());
    let result = calculate_price(&rules, &input);

    renderer.write_quote(&mut io::stdout().lock(), &input, &result)?;

    Ok(())
}

async fn ladder(
    fixture: &Fixture,
    store: &CachedRuleStore<YamlRuleSource>,
    renderer: QuoteRenderer,
    args: &LadderArgs,
) -> Result<(), CliError> {
    let product = fixture.product(&args.product)?;
    let rules = store.snapshot(Timestamp::now()).await?;
    let rows = price_ladder(
        &rules,
        product,
        args.colors.unwrap_or_default(),
        args.colors.is_some(),
    );

    renderer.write_ladder(&mut io::stdout().lock(), &rows)?;

    Ok(())
}

async fn check(
    store: &CachedRuleStore<YamlRuleSource>,
    renderer: QuoteRenderer,
    args: &CheckArgs,
) -> Result<(), CliError> {
    let rules = store.snapshot(Timestamp::now()).await?;
    let report = rules.integrity_report(args.upto);

    if !report.is_clean() {
        warn!(findings = report.findings().len(), "pricing rules have gaps or overlaps");
    }

    renderer.write_integrity(&mut io::stdout().lock(), &report)?;

    Ok(())
}

async fn interactive(
    fixture: &Fixture,
    store: &CachedRuleStore<YamlRuleSource>,
    renderer: QuoteRenderer,
    args: &InteractiveArgs,
) -> Result<(), CliError> {
    let product = fixture.product(&args.product)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let mut fields = line.split_whitespace();

        let Some(quantity) = fields.next() else {
            continue;
        };

        let quantity = match parse_quantity(quantity) {
            Ok(quantity) => quantity,
            Err(message) => {
                warn!(%message, "skipping line");
                continue;
            }
        };

        let colors = match fields.next().map(str::parse::<u32>).transpose() {
            Ok(colors) => colors,
            Err(parse_error) => {
                warn!(%parse_error, "skipping line with invalid color count");
                continue;
            }
        };

        let rules = store.snapshot(Timestamp::now()).await?;
        let input = order_line(product, quantity, colors, args.size.as_deref());
        let result = calculate_price(&rules, &input);

        let mut out = io::stdout().lock();
        renderer.write_quote(&mut out, &input, &result)?;
        out.flush()?;
    }

    Ok(())
}

fn order_line<'a>(
    product: &'a Product,
    quantity: u32,
    colors: Option<u32>,
    size: Option<&'a str>,
) -> PriceInput<'a> {
    let mut input = PriceInput::new(product, quantity);

    if let Some(colors) = colors {
        input = input.with_print(colors);
    }

    if let Some(size) = size {
        input = input.with_size(size);
    }

    input
}
