//! Text rendering of a view-state snapshot
//!
//! Pure presentation: all data-shaping decisions (pairing, percentage
//! formatting, field-name cosmetics) come from the core's adapters. A
//! section whose lookup failed is simply not rendered.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use stocksense_core::present::{
    direction_label, format_confidence, humanize_field_name, pair_info_fields,
};
use stocksense_core::{ModelVerdict, PricePoint, Ticker, ViewState};

const SPARK_BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Print every populated section of the snapshot
pub fn render_state(state: &ViewState) {
    if let Some(ticker) = &state.selected_ticker {
        println!("\n{} ({})", ticker.display_name, ticker.symbol);
    }

    if let Some((svm, rfc)) = &state.predictions {
        render_predictions(svm, rfc);
    }

    if let Some(info) = &state.info {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        for (left, right) in pair_info_fields(info) {
            table.add_row(vec![
                humanize_field_name(&left.0),
                left.1.to_string(),
                humanize_field_name(&right.0),
                right.1.to_string(),
            ]);
        }

        println!("\nStock Information\n{table}");
    }

    if let Some(series) = &state.series {
        render_series(series);
    }

    if !state.has_any_section() {
        println!("\nNo sections loaded for this selection.");
    }
}

/// Print the catalog suggestions for a query
pub fn render_suggestions(tickers: &[&Ticker]) {
    if tickers.is_empty() {
        println!("No matching symbols.");
        return;
    }
    for ticker in tickers {
        println!("  {:<12} {}", ticker.symbol, ticker.display_name);
    }
}

fn render_predictions(svm: &ModelVerdict, rfc: &ModelVerdict) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Model", "Prediction", "Confidence"]);

    table.add_row(vec![
        "SVM Model".to_string(),
        direction_label(svm.direction).to_string(),
        format_confidence(svm.confidence),
    ]);
    table.add_row(vec![
        "Random Forest Model".to_string(),
        direction_label(rfc.direction).to_string(),
        format_confidence(rfc.confidence),
    ]);

    println!("\nPredictions\n{table}");
}

fn render_series(series: &[PricePoint]) {
    println!("\nPrice History ({} points)", series.len());
    if series.is_empty() {
        return;
    }

    println!("{}", sparkline(series));

    let finite: Vec<f64> = series
        .iter()
        .map(|p| p.price)
        .filter(|p| p.is_finite())
        .collect();
    if let (Some(min), Some(max)) = (
        finite.iter().copied().reduce(f64::min),
        finite.iter().copied().reduce(f64::max),
    ) {
        let first = &series[0].label;
        let last = &series[series.len() - 1].label;
        println!("{first} … {last}   low ${min:.2}  high ${max:.2}");
    }
}

/// Scale prices onto eight block characters; non-finite values render
/// as gaps.
fn sparkline(series: &[PricePoint]) -> String {
    let finite: Vec<f64> = series
        .iter()
        .map(|p| p.price)
        .filter(|p| p.is_finite())
        .collect();

    let Some(min) = finite.iter().copied().reduce(f64::min) else {
        return String::new();
    };
    let max = finite.iter().copied().fold(min, f64::max);
    let span = max - min;

    series
        .iter()
        .map(|point| {
            if !point.price.is_finite() {
                return ' ';
            }
            if span <= f64::EPSILON {
                return SPARK_BLOCKS[3];
            }
            let level = ((point.price - min) / span * 7.0).round() as usize;
            SPARK_BLOCKS[level.min(7)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(label: &str, price: f64) -> PricePoint {
        PricePoint {
            label: label.to_string(),
            price,
        }
    }

    #[test]
    fn test_sparkline_spans_full_range() {
        let series = vec![point("a", 1.0), point("b", 4.0), point("c", 8.0)];
        let line = sparkline(&series);
        assert_eq!(line.chars().count(), 3);
        assert_eq!(line.chars().next(), Some('▁'));
        assert_eq!(line.chars().last(), Some('█'));
    }

    #[test]
    fn test_sparkline_flat_series() {
        let series = vec![point("a", 5.0), point("b", 5.0)];
        assert_eq!(sparkline(&series), "▄▄");
    }

    #[test]
    fn test_sparkline_skips_non_finite() {
        let series = vec![point("a", 1.0), point("b", f64::NAN), point("c", 2.0)];
        let line = sparkline(&series);
        assert_eq!(line.chars().nth(1), Some(' '));
    }

    #[test]
    fn test_sparkline_all_non_finite() {
        let series = vec![point("a", f64::NAN)];
        assert_eq!(sparkline(&series), "");
    }
}
