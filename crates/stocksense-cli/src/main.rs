//! Terminal front end for the StockSense data core
//!
//! Drives one ticker-selection lifecycle per input line: resolve the
//! symbol, fan out the three remote lookups, render whatever sections
//! came back. Failed sections are simply absent; the prompt always
//! stays interactive.

mod logging;
mod render;

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use stocksense_core::{
    ClientConfig, RemoteStockGateway, StalePolicy, TickerCatalog, ViewStateController,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stocksense")]
#[command(about = "Terminal dashboard for stock predictions, info and price history", long_about = None)]
struct Args {
    /// Backend base URL (defaults to http://localhost:5000, or
    /// STOCKSENSE_BACKEND_URL when set)
    #[arg(long)]
    backend: Option<String>,

    /// Analyze a single symbol and exit
    #[arg(short, long)]
    symbol: Option<String>,

    /// Clear previous results as soon as a new fetch is dispatched,
    /// instead of keeping them visible until it settles
    #[arg(long)]
    clear_on_fetch: bool,
}

fn print_banner() {
    println!("StockSense");
    println!("Type a symbol to analyze it (e.g. AAPL, TCS.NS).");
    println!("Commands: /list, /find <text>, /exit");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let args = Args::parse();

    let mut builder = ClientConfig::builder().with_env_backend_url();
    if let Some(backend) = args.backend {
        builder = builder.base_url(backend);
    }
    if args.clear_on_fetch {
        builder = builder.stale_policy(StalePolicy::ClearOnFetch);
    }
    let config = builder.build()?;

    info!(backend = %config.base_url, "starting stocksense");

    let gateway = Arc::new(RemoteStockGateway::new(&config)?);
    let controller =
        ViewStateController::new(gateway, TickerCatalog::builtin(), config.stale_policy);

    // One-shot mode
    if let Some(symbol) = args.symbol {
        let state = controller.select(&symbol).await;
        render::render_state(&state);
        return Ok(());
    }

    print_banner();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input == "/exit" || input == "/quit" {
            println!("Goodbye!");
            break;
        }

        if input == "/list" {
            render::render_suggestions(&controller.suggest(""));
        } else if let Some(query) = input.strip_prefix("/find ") {
            render::render_suggestions(&controller.suggest(query.trim()));
        } else {
            // Anything else is a symbol selection.
            let state = controller.select(input).await;
            render::render_state(&state);
        }
    }

    Ok(())
}
