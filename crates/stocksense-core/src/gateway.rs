//! Remote gateway for the three per-ticker lookups
//!
//! One fetch cycle fans out the prediction, info and history requests
//! concurrently and joins on all three. A failing resource never cancels
//! or blocks its siblings; each failure is caught at this boundary and
//! carried as a [`FetchOutcome::Failure`]. No retries, no caching.

use crate::config::ClientConfig;
use crate::error::{FetchError, Result, SenseError};
use crate::model::{
    Direction, FetchBundle, FetchOutcome, FieldValue, InfoRecord, ModelVerdict, RawSeries, Ticker,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::warn;
use url::Url;

/// Seam between the view-state controller and the remote backend.
///
/// `fetch_all` returns only after all three lookups have settled.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockGateway: Send + Sync {
    async fn fetch_all(&self, ticker: &Ticker) -> FetchBundle;
}

/// HTTP gateway against the prediction backend.
///
/// Every invocation re-fetches; retry policy, if any, belongs to the
/// caller (the current design has none: a failed resource simply renders
/// as absent).
#[derive(Debug, Clone)]
pub struct RemoteStockGateway {
    client: Client,
    predict_url: Url,
    info_url: Url,
    chart_url: Url,
}

impl RemoteStockGateway {
    /// Create a gateway from the client configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SenseError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            predict_url: endpoint(&config.base_url, "predict")?,
            info_url: endpoint(&config.base_url, "stock-info")?,
            chart_url: endpoint(&config.base_url, "chart-data")?,
        })
    }

    async fn post_json(&self, url: &Url, symbol: &str) -> std::result::Result<Value, FetchError> {
        let response = self
            .client
            .post(url.clone())
            .json(&serde_json::json!({ "stock": symbol }))
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!("HTTP {status}")));
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                FetchError::Parse(e.to_string())
            } else {
                FetchError::Network(e.to_string())
            }
        })
    }

    async fn fetch_predictions(&self, symbol: &str) -> FetchOutcome<(ModelVerdict, ModelVerdict)> {
        settle(
            "prediction",
            symbol,
            self.post_json(&self.predict_url, symbol)
                .await
                .and_then(|value| parse_predictions(&value)),
        )
    }

    async fn fetch_info(&self, symbol: &str) -> FetchOutcome<InfoRecord> {
        settle(
            "info",
            symbol,
            self.post_json(&self.info_url, symbol)
                .await
                .and_then(parse_info),
        )
    }

    async fn fetch_history(&self, symbol: &str) -> FetchOutcome<RawSeries> {
        settle(
            "history",
            symbol,
            self.post_json(&self.chart_url, symbol)
                .await
                .and_then(parse_history),
        )
    }
}

#[async_trait]
impl StockGateway for RemoteStockGateway {
    /// Fan-out/fan-in over the three lookups, no short-circuit.
    async fn fetch_all(&self, ticker: &Ticker) -> FetchBundle {
        let symbol = ticker.symbol.as_str();
        let (predictions, info, series) = tokio::join!(
            self.fetch_predictions(symbol),
            self.fetch_info(symbol),
            self.fetch_history(symbol),
        );

        FetchBundle {
            predictions,
            info,
            series,
        }
    }
}

/// Resolve an endpoint path against the backend base URL
fn endpoint(base: &Url, path: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| SenseError::Config(format!("backend URL `{base}` cannot be a base")))?
        .pop_if_empty()
        .push(path);
    Ok(url)
}

/// Convert a per-resource result into a settled outcome, logging the
/// failure reason (the display only shows the section as absent).
fn settle<T>(
    resource: &str,
    symbol: &str,
    result: std::result::Result<T, FetchError>,
) -> FetchOutcome<T> {
    match result {
        Ok(payload) => FetchOutcome::Success(payload),
        Err(error) => {
            warn!(resource, symbol, %error, "remote lookup failed");
            FetchOutcome::Failure(error)
        }
    }
}

/// Parse the prediction response: `svm` and `rfc` objects, each with an
/// integer `prediction` (1 = up, anything else = down) and an optional
/// `precision_score`.
fn parse_predictions(value: &Value) -> std::result::Result<(ModelVerdict, ModelVerdict), FetchError> {
    let svm = parse_verdict(value, "svm")?;
    let rfc = parse_verdict(value, "rfc")?;
    Ok((svm, rfc))
}

fn parse_verdict(value: &Value, model: &str) -> std::result::Result<ModelVerdict, FetchError> {
    let entry = value
        .get(model)
        .ok_or_else(|| FetchError::Parse(format!("missing `{model}` entry")))?;

    let prediction = entry
        .get("prediction")
        .and_then(Value::as_i64)
        .ok_or_else(|| FetchError::Parse(format!("`{model}.prediction` is not an integer")))?;

    let direction = if prediction == 1 {
        Direction::Up
    } else {
        Direction::Down
    };

    // A missing or malformed score degrades to an unknown confidence
    // rather than failing the whole resource.
    let confidence = entry
        .get("precision_score")
        .and_then(Value::as_f64)
        .filter(|score| score.is_finite());

    Ok(ModelVerdict::new(direction, confidence))
}

/// Parse the info response: an object of field name to scalar, wire order
/// preserved. Non-scalar members degrade to `Unavailable`.
fn parse_info(value: Value) -> std::result::Result<InfoRecord, FetchError> {
    let Value::Object(map) = value else {
        return Err(FetchError::Parse("info payload is not an object".to_string()));
    };

    let fields = map
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                Value::String(text) => FieldValue::Text(text),
                Value::Number(number) => FieldValue::Number(number),
                _ => FieldValue::Unavailable,
            };
            (name, value)
        })
        .collect();

    Ok(InfoRecord::new(fields))
}

/// Parse the history response into the raw label/price series
fn parse_history(value: Value) -> std::result::Result<RawSeries, FetchError> {
    serde_json::from_value(value).map_err(|e| FetchError::Parse(e.to_string()))
}
