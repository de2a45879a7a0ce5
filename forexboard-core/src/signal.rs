//! Trade signal payloads returned by `GET /backtest/`.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Fixed number of signals per page requested from the service.
pub const PAGE_SIZE: u32 = 20;

/// Direction of a trade signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalKind {
    Buy,
    Sell,
}

impl SignalKind {
    pub fn label(self) -> &'static str {
        match self {
            SignalKind::Buy => "BUY",
            SignalKind::Sell => "SELL",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SignalKind::Buy => "Buy Trade",
            SignalKind::Sell => "Sell Trade",
        }
    }
}

/// One historical entry recommendation produced by the backtest engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeSignal {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub entry_price: f64,
    pub target: f64,
    pub stop_loss: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: NaiveDateTime,
    /// Simulated profit of the trade, when the service reports it.
    #[serde(default)]
    pub profit_loss: Option<f64>,
    /// Running capital after the trade, when the service reports it.
    #[serde(default)]
    pub capital: Option<f64>,
}

/// Aggregate figures computed by the service over the whole signal list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PageSummary {
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_signals: Option<u64>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub total_profit_loss: Option<f64>,
    #[serde(default)]
    pub final_capital: Option<f64>,
}

/// Raw body of `GET /backtest/`. Both fields may be absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SignalResponse {
    #[serde(default)]
    pub signals: Option<Vec<TradeSignal>>,
    #[serde(default)]
    pub summary: Option<PageSummary>,
}

/// One loaded page of signals.
#[derive(Debug, Clone, PartialEq)]
pub struct TradePage {
    pub signals: Vec<TradeSignal>,
    /// Always at least 1.
    pub total_pages: u32,
    pub summary: PageSummary,
}

impl TradePage {
    /// Turn a response into a page. `None` when the response carries no
    /// signals, which callers report as "no trade history".
    pub fn from_response(response: SignalResponse) -> Option<Self> {
        let signals = response.signals.filter(|s| !s.is_empty())?;
        let summary = response.summary.unwrap_or_default();
        Some(Self {
            signals,
            total_pages: summary.total_pages.max(1),
            summary,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

/// Query parameters of one page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalQuery {
    pub symbol: String,
    pub timeframe: String,
    pub page: u32,
    pub limit: u32,
}

/// Accepts `YYYY-MM-DD HH:MM:SS` (what the service sends), the `T`-separated
/// ISO form, or RFC 3339 with an offset (converted to local wall-clock time).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Local).naive_local())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const BODY: &str = r#"{
        "summary": {
            "total_profit_loss": 1520.5,
            "final_capital": 101520.5,
            "total_signals": 45,
            "current_page": 2,
            "total_pages": 3
        },
        "signals": [
            {"timestamp": "2024-03-01 14:00:00", "type": "BUY", "entry_price": 1.08312,
             "stop_loss": 1.07229, "target": 1.11561, "profit_loss": 650.0, "capital": 100650.0},
            {"timestamp": "2024-03-04 09:00:00", "type": "SELL", "entry_price": 1.0855,
             "stop_loss": 1.09636, "target": 1.05294, "profit_loss": 870.5, "capital": 101520.5}
        ]
    }"#;

    #[test]
    fn parses_service_payload() {
        let resp: SignalResponse = serde_json::from_str(BODY).unwrap();
        let page = TradePage::from_response(resp).unwrap();
        assert_eq!(page.signals.len(), 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.summary.total_signals, Some(45));
        assert_eq!(page.signals[0].kind, SignalKind::Buy);
        assert_eq!(page.signals[1].kind, SignalKind::Sell);
        assert_eq!(
            page.signals[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(14, 0, 0).unwrap()
        );
        assert_eq!(page.signals[1].capital, Some(101520.5));
    }

    #[test]
    fn empty_or_missing_signals_yield_no_page() {
        let empty: SignalResponse =
            serde_json::from_str(r#"{"signals": [], "summary": {"total_pages": 1}}"#).unwrap();
        assert!(TradePage::from_response(empty).is_none());

        let missing: SignalResponse = serde_json::from_str(r#"{"summary": {"total_pages": 0}}"#).unwrap();
        assert!(TradePage::from_response(missing).is_none());
    }

    #[test]
    fn missing_summary_means_single_page() {
        let resp: SignalResponse = serde_json::from_str(
            r#"{"signals": [{"timestamp": "2024-01-02 00:00:00", "type": "BUY",
                "entry_price": 1.0, "stop_loss": 0.99, "target": 1.03}]}"#,
        )
        .unwrap();
        let page = TradePage::from_response(resp).unwrap();
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.signals[0].profit_loss, None);
    }

    #[test]
    fn unknown_signal_type_is_rejected() {
        let res = serde_json::from_str::<TradeSignal>(
            r#"{"timestamp": "2024-01-02 00:00:00", "type": "HOLD",
                "entry_price": 1.0, "stop_loss": 0.99, "target": 1.03}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(7, 8, 9)
            .unwrap();
        assert_eq!(parse_timestamp("2024-05-06 07:08:09"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-06T07:08:09"), Some(expected));
        assert!(parse_timestamp("2024-05-06T07:08:09+00:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn kind_labels() {
        assert_eq!(SignalKind::Buy.label(), "BUY");
        assert_eq!(SignalKind::Sell.description(), "Sell Trade");
    }
}
