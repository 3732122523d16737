/// Renders a ticker into the instruction prompt. Pure; the same ticker always
/// produces the same prompt.
pub fn build_analysis_prompt(ticker: &str) -> String {
    let schema = [
        "{",
        "  \"companyName\": \"Apple Inc.\",",
        "  \"ticker\": \"AAPL\",",
        "  \"stockExchange\": \"NASDAQ\",",
        "  \"currentPrice\": 150.25,",
        "  \"priceChange\": { \"value\": -1.5, \"percentage\": -0.99 },",
        "  \"summary\": \"Concise overview of the company and its recent performance.\",",
        "  \"financialHighlights\": [",
        "    { \"metric\": \"Market Cap\", \"value\": \"$2.5T\" },",
        "    { \"metric\": \"52 Week Range\", \"value\": \"$124.17 - $199.62\" }",
        "  ],",
        "  \"newsAnalysis\": \"Synthesis of recent news coverage and its likely impact.\",",
        "  \"analystRating\": { \"rating\": \"Buy\", \"targetPrice\": 195.5 },",
        "  \"pros\": [\"Strong brand loyalty\", \"Growing services revenue\"],",
        "  \"cons\": [\"Hardware demand is cyclical\", \"Regulatory pressure\"]",
        "}",
    ]
    .join("\n");

    format!(
        "You are a financial analyst. Analyze the stock with ticker symbol \"{ticker}\".\n\
         Use web search to ground the analysis in the latest available information.\n\
         Respond with a single valid JSON object and nothing else: no prose before or after it, no markdown code fences.\n\
         The object must follow this exact shape (example values are illustrative):\n\
         {schema}\n\
         Rules:\n\
         - currentPrice, priceChange.value, priceChange.percentage and analystRating.targetPrice must be JSON numbers, not quoted strings.\n\
         - financialHighlights values are pre-formatted display strings and stay strings (e.g. \"$2.5T\").\n\
         - analystRating.rating must be one of \"Strong Buy\", \"Buy\", \"Hold\", \"Sell\", \"Strong Sell\", \"N/A\".\n\
         - If no information can be found for \"{ticker}\", respond with a JSON object containing only an \"error\" field that explains the ticker was not found."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_the_ticker() {
        let prompt = build_analysis_prompt("TSM");
        assert!(prompt.contains("\"TSM\""));
    }

    #[test]
    fn prompt_lists_every_record_field() {
        let prompt = build_analysis_prompt("MSFT");
        for field in [
            "companyName",
            "ticker",
            "stockExchange",
            "currentPrice",
            "priceChange",
            "value",
            "percentage",
            "summary",
            "financialHighlights",
            "metric",
            "newsAnalysis",
            "analystRating",
            "rating",
            "targetPrice",
            "pros",
            "cons",
            "error",
        ] {
            assert!(prompt.contains(field), "prompt is missing field {field}");
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(build_analysis_prompt("TSLA"), build_analysis_prompt("TSLA"));
    }

    #[test]
    fn prompt_demands_bare_json() {
        let prompt = build_analysis_prompt("AAPL");
        assert!(prompt.contains("single valid JSON object"));
        assert!(prompt.contains("no markdown code fences"));
    }
}
