//! Static catalog of known ticker symbols

use crate::model::Ticker;

/// Ordered set of known tickers with display names.
///
/// The catalog is small and static; lookups never fail and suggestion
/// results are unbounded.
#[derive(Debug, Clone)]
pub struct TickerCatalog {
    entries: Vec<Ticker>,
}

impl TickerCatalog {
    /// Create a catalog from the given entries, preserving order.
    ///
    /// Symbol uniqueness is an invariant: duplicates after the first
    /// occurrence are dropped.
    pub fn new(entries: Vec<Ticker>) -> Self {
        let mut unique: Vec<Ticker> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !unique.iter().any(|t| t.symbol == entry.symbol) {
                unique.push(entry);
            }
        }
        Self { entries: unique }
    }

    /// The built-in selection offered by the dashboard
    pub fn builtin() -> Self {
        Self::new(vec![
            Ticker::new("RELIANCE.NS", "Reliance Industries"),
            Ticker::new("TCS.NS", "Tata Consultancy Services"),
            Ticker::new("INFY.NS", "Infosys"),
            Ticker::new("AAPL", "Apple Inc."),
            Ticker::new("GOOGL", "Alphabet Inc."),
            Ticker::new("MSFT", "Microsoft"),
            Ticker::new("AMZN", "Amazon"),
            Ticker::new("TSLA", "Tesla"),
        ])
    }

    /// Exact-match lookup on the symbol
    pub fn resolve(&self, symbol: &str) -> Option<&Ticker> {
        self.entries.iter().find(|t| t.symbol == symbol)
    }

    /// Case-insensitive substring match over symbol and display name,
    /// catalog order preserved.
    pub fn suggest(&self, query: &str) -> Vec<&Ticker> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|t| {
                t.symbol.to_lowercase().contains(&query)
                    || t.display_name.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn entries(&self) -> &[Ticker] {
        &self.entries
    }
}

impl Default for TickerCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
