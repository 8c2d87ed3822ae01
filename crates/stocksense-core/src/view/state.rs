//! The consolidated display state

use crate::model::{InfoRecord, ModelVerdict, PriceSeries, Ticker};

/// Everything the front end needs to render one snapshot.
///
/// Invariant: while `loading` is true the three result slots reflect the
/// previous settled state (or `None`), never a half-updated mix from the
/// in-flight request. The controller applies all three outcomes
/// atomically once they have settled.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    /// Currently selected ticker, if any
    pub selected_ticker: Option<Ticker>,

    /// True while a fetch cycle is outstanding
    pub loading: bool,

    /// SVM and random-forest verdicts, in that order
    pub predictions: Option<(ModelVerdict, ModelVerdict)>,

    /// Descriptive fields of the selected stock
    pub info: Option<InfoRecord>,

    /// Chart-ready price history
    pub series: Option<PriceSeries>,
}

impl ViewState {
    /// True when nothing is selected, loading or displayed
    pub fn is_idle(&self) -> bool {
        self.selected_ticker.is_none() && !self.loading && !self.has_any_section()
    }

    /// True when at least one result slot is populated
    pub fn has_any_section(&self) -> bool {
        self.predictions.is_some() || self.info.is_some() || self.series.is_some()
    }

    /// Empty all three result slots
    pub fn clear_sections(&mut self) {
        self.predictions = None;
        self.info = None;
        self.series = None;
    }
}
