//! Subcommand implementations

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use swapform_core::{filter_tokens, parse_balances, rank_balances, AppConfig};
use swapform_executor::SwapSession;
use swapform_price_feed::{
    AggregatorConfig, HttpQuoteSource, PriceAggregator, QuoteSource, StaticQuoteSource,
};

use crate::cli::{Cli, Command, SwapArgs};
use crate::render;

fn build_source(settings: &AppConfig, offline: bool) -> anyhow::Result<Arc<dyn QuoteSource>> {
    if offline {
        info!("Using built-in mock prices");
        return Ok(Arc::new(StaticQuoteSource::demo()));
    }
    Ok(Arc::new(HttpQuoteSource::from_config(&settings.feed)?))
}

/// Fetch once; a failure is reported with the retry hint
async fn load_quotes(aggregator: &PriceAggregator) -> anyhow::Result<()> {
    if let Err(e) = aggregator.refresh().await {
        println!("{}", e.user_message());
        return Err(e.into());
    }
    Ok(())
}

pub async fn run(cli: Cli, settings: AppConfig) -> anyhow::Result<()> {
    let source = build_source(&settings, cli.offline)?;
    let aggregator = PriceAggregator::new(AggregatorConfig::from(&settings.feed), source);

    match cli.command {
        Command::Prices { search, exclude } => prices(&aggregator, search, exclude).await,
        Command::Quote(args) => quote(&aggregator, &settings, args).await,
        Command::Swap(args) => swap(&aggregator, &settings, args).await,
        Command::Watch { polls } => watch(aggregator, polls).await,
        Command::Wallet { balances } => wallet(&aggregator, &balances).await,
    }
}

async fn prices(
    aggregator: &PriceAggregator,
    search: Option<String>,
    exclude: Option<String>,
) -> anyhow::Result<()> {
    load_quotes(aggregator).await?;

    let book = aggregator.book();
    let quotes = book.quotes();
    let excluded = exclude.as_deref().and_then(|symbol| book.find(symbol));
    let shown = filter_tokens(&quotes, search.as_deref().unwrap_or(""), excluded.as_ref());

    if shown.is_empty() {
        println!("No tokens found");
    }
    for quote in shown {
        println!("{}", render::quote_line(quote));
    }
    Ok(())
}

async fn open_session(
    aggregator: &PriceAggregator,
    settings: &AppConfig,
    args: &SwapArgs,
) -> anyhow::Result<SwapSession> {
    load_quotes(aggregator).await?;

    let mut session = SwapSession::new(
        aggregator.refresher(),
        &settings.form,
        aggregator.config().max_quote_age,
    );
    session.select_source(&args.from)?;
    session.select_destination(&args.to)?;
    session.set_amount(&args.amount);
    Ok(session)
}

async fn quote(aggregator: &PriceAggregator, settings: &AppConfig, args: SwapArgs) -> anyhow::Result<()> {
    let session = open_session(aggregator, settings, &args).await?;

    for line in render::swap_lines(&session.resolved_state(), &session.display()) {
        println!("{}", line);
    }
    Ok(())
}

async fn swap(aggregator: &PriceAggregator, settings: &AppConfig, args: SwapArgs) -> anyhow::Result<()> {
    let mut session = open_session(aggregator, settings, &args).await?;

    for line in render::swap_lines(&session.resolved_state(), &session.display()) {
        println!("{}", line);
    }

    if let Err(reason) = session.validate() {
        println!("{}", reason);
        return Err(reason.into());
    }

    println!("Swapping...");
    let receipt = session.submit().await?;
    for line in render::receipt_lines(&receipt) {
        println!("{}", line);
    }
    Ok(())
}

async fn watch(mut aggregator: PriceAggregator, polls: Option<u64>) -> anyhow::Result<()> {
    aggregator.start().await?;
    let book = aggregator.book();
    let interval = aggregator.config().poll_interval;
    let max_age = aggregator.config().max_quote_age;

    info!("Watching prices, Ctrl+C to stop");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C");
                break;
            }
            _ = tokio::time::sleep(interval) => {}
        }

        let stats = aggregator.stats();
        println!(
            "{} | {} quotes | {} refreshes | {} failures",
            render::status_line(&book.status(max_age)),
            stats.quote_count,
            stats.refresh_count,
            stats.failure_count
        );

        if let Some(limit) = polls {
            if stats.refresh_count + stats.failure_count >= limit {
                break;
            }
        }
    }

    aggregator.stop().await;
    Ok(())
}

async fn wallet(aggregator: &PriceAggregator, path: &Path) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(path).await?;
    let balances = parse_balances(&text)?;

    if let Err(e) = load_quotes(aggregator).await {
        warn!("Valuing wallet without prices: {}", e);
    }

    let rows = rank_balances(&balances, &aggregator.book().price_map());
    let total: f64 = rows.iter().filter_map(|r| r.usd_value).sum();

    for row in &rows {
        println!("{}", render::wallet_line(row));
    }
    println!("Total: {}", render::usd(total));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn offline(args: &[&str]) -> Cli {
        let mut argv = vec!["swapform", "--offline"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn test_offline_quote() {
        let cli = offline(&["quote", "--from", "ETH", "--to", "USDC", "--amount", "1"]);
        assert!(run(cli, AppConfig::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_token_fails() {
        let cli = offline(&["quote", "--from", "DOGE", "--to", "USDC", "--amount", "1"]);
        assert!(run(cli, AppConfig::default()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_swap_and_validation() {
        let cli = offline(&["swap", "--from", "ETH", "--to", "USDC", "--amount", "2"]);
        assert!(run(cli, AppConfig::default()).await.is_ok());

        let cli = offline(&["swap", "--from", "ETH", "--to", "USDC", "--amount", "0"]);
        let err = run(cli, AppConfig::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Enter an amount");
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_stops_after_polls() {
        let cli = offline(&["watch", "--polls", "2"]);
        assert!(run(cli, AppConfig::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_wallet_from_file() {
        let path = std::env::temp_dir().join(format!("swapform-wallet-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"currency":"ETH","amount":2.3,"blockchain":"Ethereum"},{"currency":"MATIC","amount":10.2,"blockchain":"Polygon"}]"#,
        )
        .unwrap();

        let cli = offline(&["wallet", "--balances", path.to_str().unwrap()]);
        let result = run(cli, AppConfig::default()).await;
        std::fs::remove_file(&path).ok();

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_wallet_rejects_malformed_file() {
        let path = std::env::temp_dir().join(format!("swapform-bad-wallet-{}.json", std::process::id()));
        tokio::fs::write(&path, "not json").await.unwrap();

        let cli = offline(&["wallet", "--balances", path.to_str().unwrap()]);
        let result = run(cli, AppConfig::default()).await;
        tokio::fs::remove_file(&path).await.ok();

        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("Serialization error:"));
    }

    #[tokio::test]
    async fn test_wallet_missing_file_fails() {
        let cli = offline(&["wallet", "--balances", "/nonexistent/swapform-wallet.json"]);
        assert!(run(cli, AppConfig::default()).await.is_err());
    }
}
