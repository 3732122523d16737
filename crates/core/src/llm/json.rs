use crate::domain::analysis::{AnalysisData, StockAnalysis};
use crate::llm::error::AnalysisError;

/// Locates the JSON object inside free-form model output: the span from the
/// first `{` to the last `}`. Surrounding prose and markdown fences fall
/// outside the braces, so the greedy span is enough here; no balancing is
/// attempted and the parse stage remains the correctness gate.
pub fn extract_json(text: &str) -> Result<&str, AnalysisError> {
    let start = text.find('{').ok_or(AnalysisError::Extraction)?;
    let end = text.rfind('}').ok_or(AnalysisError::Extraction)?;
    if end < start {
        return Err(AnalysisError::Extraction);
    }
    Ok(&text[start..=end])
}

/// Strict parse of the extracted substring. An object carrying an `error`
/// string is the "not found" outcome and is checked before the full-record
/// decode; everything else must decode as a complete `StockAnalysis`.
pub fn parse_analysis(json: &str) -> Result<AnalysisData, AnalysisError> {
    let value = serde_json::from_str::<serde_json::Value>(json)
        .map_err(|err| AnalysisError::MalformedResponse(err.to_string()))?;

    if let Some(message) = value.get("error").and_then(serde_json::Value::as_str) {
        return Ok(AnalysisData::NotFound {
            error: message.to_string(),
        });
    }

    let analysis = serde_json::from_value::<StockAnalysis>(value)
        .map_err(|err| AnalysisError::MalformedResponse(err.to_string()))?;
    Ok(AnalysisData::Report(analysis))
}
