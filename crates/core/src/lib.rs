pub mod domain;
pub mod llm;
pub mod session;

pub mod config {
    use crate::llm::error::AnalysisError;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub gemini_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> Self {
            Self {
                gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            }
        }

        pub fn require_gemini_api_key(&self) -> Result<&str, AnalysisError> {
            self.gemini_api_key
                .as_deref()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| {
                    AnalysisError::Configuration("GEMINI_API_KEY is required".to_string())
                })
        }
    }
}
