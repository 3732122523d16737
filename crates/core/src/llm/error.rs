use std::fmt;

/// Pipeline failure, tagged by stage so callers can branch on kind instead of
/// sniffing message text. The domain "not found" outcome is not represented
/// here; it is a normal result variant (`AnalysisData::NotFound`).
#[derive(Debug, Clone)]
pub enum AnalysisError {
    /// The request ticker was empty after trimming.
    EmptyTicker,
    /// Required configuration (the API key) is missing; raised before any
    /// network call is attempted.
    Configuration(String),
    /// The provider rejected the credential.
    Authentication(String),
    /// Any other transport or provider failure.
    Generation(String),
    /// The model response contained no `{...}` shaped substring.
    Extraction,
    /// A JSON-shaped substring was found but did not parse into the analysis
    /// record.
    MalformedResponse(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::EmptyTicker => write!(f, "ticker must be non-empty"),
            AnalysisError::Configuration(detail) => write!(f, "configuration error: {detail}"),
            AnalysisError::Authentication(detail) => {
                write!(f, "the generation provider rejected the API key: {detail}")
            }
            AnalysisError::Generation(detail) => write!(f, "generation request failed: {detail}"),
            AnalysisError::Extraction => {
                write!(f, "the model response contained no JSON object")
            }
            AnalysisError::MalformedResponse(detail) => {
                write!(f, "the model response was not a valid analysis record: {detail}")
            }
        }
    }
}

impl std::error::Error for AnalysisError {}
