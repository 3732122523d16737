pub mod error;
pub mod gemini;
pub mod json;
pub mod prompt;

use crate::domain::analysis::{AnalysisReport, GroundingSource};
use error::AnalysisError;

/// A validated analysis request. Tickers are trimmed and uppercased on entry.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    ticker: String,
}

impl AnalysisRequest {
    pub fn try_new(raw_ticker: &str) -> Result<Self, AnalysisError> {
        let ticker = raw_ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(AnalysisError::EmptyTicker);
        }
        Ok(Self { ticker })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }
}

/// Raw output of a grounded generation call: the model text plus the
/// citations the provider attributed its claims to.
#[derive(Debug, Clone)]
pub struct GroundedResponse {
    pub text: String,
    pub sources: Vec<GroundingSource>,
}

#[async_trait::async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GroundedResponse, AnalysisError>;
}

/// Runs the full pipeline for one ticker: build prompt, generate, extract,
/// parse. One outbound call, no retries; a failed invocation is terminal and
/// restarts only on a new user action.
pub async fn analyze(
    client: &impl GenerationClient,
    ticker: &str,
) -> Result<AnalysisReport, AnalysisError> {
    let request = AnalysisRequest::try_new(ticker)?;
    let prompt = prompt::build_analysis_prompt(request.ticker());

    let response = client.generate(&prompt).await?;
    let extracted = json::extract_json(&response.text)?;
    let analysis_data = json::parse_analysis(extracted)?;

    // "Not found" is a normal outcome, but it carries no citations.
    let not_found = analysis_data.error().is_some();
    let sources_data = if not_found {
        Vec::new()
    } else {
        response.sources
    };

    tracing::info!(
        ticker = %request.ticker(),
        not_found,
        sources = sources_data.len(),
        "stock analysis completed"
    );

    Ok(AnalysisReport {
        analysis_data,
        sources_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::WebSource;
    use serde_json::json;

    struct StubClient {
        response: Result<GroundedResponse, AnalysisError>,
    }

    impl StubClient {
        fn with_text(text: &str) -> Self {
            Self {
                response: Ok(GroundedResponse {
                    text: text.to_string(),
                    sources: Vec::new(),
                }),
            }
        }

        fn with_text_and_sources(text: &str, sources: Vec<GroundingSource>) -> Self {
            Self {
                response: Ok(GroundedResponse {
                    text: text.to_string(),
                    sources,
                }),
            }
        }
    }

    #[async_trait::async_trait]
    impl GenerationClient for StubClient {
        async fn generate(&self, _prompt: &str) -> Result<GroundedResponse, AnalysisError> {
            self.response.clone()
        }
    }

    fn example_sources() -> Vec<GroundingSource> {
        vec![GroundingSource {
            web: Some(WebSource {
                uri: "https://example.com/apple".to_string(),
                title: "Apple coverage".to_string(),
            }),
        }]
    }

    #[tokio::test]
    async fn fenced_model_output_yields_a_full_report() {
        let body = json!({
            "companyName": "Apple Inc.",
            "ticker": "AAPL",
            "stockExchange": "NASDAQ",
            "currentPrice": 150.25,
            "priceChange": { "value": -1.5, "percentage": -0.99 },
            "summary": "...",
            "financialHighlights": [{ "metric": "Market Cap", "value": "$2.5T" }],
            "newsAnalysis": "...",
            "analystRating": { "rating": "Buy", "targetPrice": 195.5 },
            "pros": ["..."],
            "cons": ["..."]
        })
        .to_string();
        let client =
            StubClient::with_text_and_sources(&format!("```json\n{body}\n```"), example_sources());

        let report = analyze(&client, "AAPL").await.unwrap();
        let analysis = report.analysis_data.report().expect("expected a report");
        assert_eq!(analysis.company_name, "Apple Inc.");
        assert_eq!(analysis.current_price, 150.25);
        assert_eq!(report.sources_data.len(), 1);
    }

    #[tokio::test]
    async fn unknown_ticker_resolves_with_error_set_and_no_sources() {
        let client = StubClient::with_text_and_sources(
            r#"{"error":"No information found for ticker 'ZZZZINVALID'"}"#,
            example_sources(),
        );

        let report = analyze(&client, "ZZZZINVALID").await.unwrap();
        assert_eq!(
            report.analysis_data.error(),
            Some("No information found for ticker 'ZZZZINVALID'")
        );
        assert!(report.sources_data.is_empty());
    }

    #[tokio::test]
    async fn prose_only_output_fails_at_the_extraction_stage() {
        let client = StubClient::with_text("I'm sorry, I cannot answer that.");
        let err = analyze(&client, "AAPL").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Extraction));
    }

    #[tokio::test]
    async fn garbled_json_fails_at_the_parse_stage() {
        let client = StubClient::with_text("{\"companyName\": \"Apple\", }");
        let err = analyze(&client, "AAPL").await.unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn blank_ticker_is_rejected_before_generation() {
        let client = StubClient {
            response: Err(AnalysisError::Generation(
                "generate should not be reached".to_string(),
            )),
        };
        let err = analyze(&client, "   ").await.unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyTicker));
    }

    #[tokio::test]
    async fn ticker_is_normalized_to_uppercase() {
        let request = AnalysisRequest::try_new("  aapl ").unwrap();
        assert_eq!(request.ticker(), "AAPL");
    }

    #[tokio::test]
    async fn provider_failures_propagate_unchanged() {
        let client = StubClient {
            response: Err(AnalysisError::Authentication("key rejected".to_string())),
        };
        let err = analyze(&client, "AAPL").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Authentication(_)));
    }
}
