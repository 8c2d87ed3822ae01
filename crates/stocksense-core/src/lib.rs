//! StockSense data-orchestration core
//!
//! This crate is the data core behind a stock dashboard: the user picks a
//! ticker, three independent remote lookups run concurrently (direction
//! predictions, descriptive info, historical prices), and the results are
//! reconciled into a single consistent view state. It includes:
//!
//! - A static [`catalog::TickerCatalog`] of known symbols with suggestion
//!   lookup for selection input
//! - A [`gateway::RemoteStockGateway`] that fans the three HTTP lookups
//!   out concurrently and joins on all of them, converting every failure
//!   into a settled outcome instead of an error
//! - A [`projector`] deriving the chart-ready series from raw history
//! - A [`view::ViewStateController`] owning the fetch lifecycle, the
//!   stale-request guard and the failure policy, publishing immutable
//!   snapshots through a watch channel
//! - Pure [`present`] adapters shaping result slots for display
//!
//! Partial and total failure are first-class: a failed resource renders
//! as an absent section, and the session always remains interactive.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stocksense_core::{
//!     ClientConfig, RemoteStockGateway, TickerCatalog, ViewStateController,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::builder().with_env_backend_url().build()?;
//!     let gateway = Arc::new(RemoteStockGateway::new(&config)?);
//!     let controller =
//!         ViewStateController::new(gateway, TickerCatalog::builtin(), config.stale_policy);
//!
//!     let state = controller.select("AAPL").await;
//!     println!("{state:#?}");
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod present;
pub mod projector;
pub mod view;

// Re-export main types for convenience
pub use catalog::TickerCatalog;
pub use config::{ClientConfig, ClientConfigBuilder, StalePolicy};
pub use error::{FetchError, Result, SenseError};
pub use gateway::{RemoteStockGateway, StockGateway};
pub use model::{
    Direction, FetchBundle, FetchOutcome, FieldValue, InfoRecord, ModelVerdict, PricePoint,
    PriceSeries, RawSeries, Ticker,
};
pub use view::{ViewState, ViewStateController};
