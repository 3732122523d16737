use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceChange {
    pub value: f64,
    pub percentage: f64,
}

/// One row of the highlights table. Values are pre-formatted display strings
/// ("$2.5T", "$124.17 - $199.62"), not numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialHighlight {
    pub metric: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingLabel {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    Hold,
    Sell,
    #[serde(rename = "Strong Sell")]
    StrongSell,
    // Anything outside the prompt's vocabulary decodes as N/A.
    #[serde(rename = "N/A", other)]
    NotAvailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalystRating {
    pub rating: RatingLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_price: Option<f64>,
}

/// The canonical analysis record, serialized with the camelCase field names
/// the presentation layer consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAnalysis {
    pub company_name: String,
    pub ticker: String,
    pub stock_exchange: String,
    pub current_price: f64,
    pub price_change: PriceChange,
    pub summary: String,
    pub financial_highlights: Vec<FinancialHighlight>,
    pub news_analysis: String,
    pub analyst_rating: AnalystRating,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Exactly one branch is ever active: a full report, or the "not found"
/// outcome for a ticker the model has no information on. On the wire this is
/// either the complete record or `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisData {
    Report(StockAnalysis),
    NotFound { error: String },
}

impl AnalysisData {
    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisData::NotFound { error } => Some(error),
            AnalysisData::Report(_) => None,
        }
    }

    pub fn report(&self) -> Option<&StockAnalysis> {
        match self {
            AnalysisData::Report(analysis) => Some(analysis),
            AnalysisData::NotFound { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSource {
    pub uri: String,
    pub title: String,
}

/// One grounding citation. Citations without a `web` sub-record are kept;
/// filtering non-renderable ones is the presentation layer's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundingSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

/// Success payload of the pipeline: the validated record plus the citations
/// captured from the grounded generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub analysis_data: AnalysisData,
    pub sources_data: Vec<GroundingSource>,
}
