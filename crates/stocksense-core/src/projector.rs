//! Projection of raw historical data into a chart-ready series

use crate::model::{PricePoint, PriceSeries, RawSeries};
use tracing::warn;

/// Convert a raw label/price payload into an ordered series.
///
/// Labels and prices are expected to be index-aligned; a length mismatch
/// is an external-data anomaly that truncates to the shorter side and is
/// logged, never raised. Non-finite prices pass through as-is; no
/// smoothing, no label validation.
pub fn project(raw: &RawSeries) -> PriceSeries {
    if raw.labels.len() != raw.prices.len() {
        warn!(
            labels = raw.labels.len(),
            prices = raw.prices.len(),
            "series lengths mismatch, truncating to the shorter side"
        );
    }

    raw.labels
        .iter()
        .zip(raw.prices.iter())
        .map(|(label, price)| PricePoint {
            label: label.clone(),
            price: *price,
        })
        .collect()
}
