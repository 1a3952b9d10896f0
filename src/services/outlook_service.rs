use std::fmt::Write;

use tracing::{info, warn};

use crate::external::llm::LlmProvider;
use crate::external::news::{Headline, NewsProvider};
use crate::services::news_service;

pub const NO_NEWS_MESSAGE: &str = "No recent news available to analyze.";
pub const ANALYSIS_FAILED_MESSAGE: &str = "AI analysis failed. Please try again later.";

/// Headlines fed into one outlook prompt.
pub const OUTLOOK_HEADLINES: usize = 5;
pub const OUTLOOK_WINDOW_DAYS: i64 = 30;

pub fn build_prompt(ticker: &str, headlines: &[Headline]) -> String {
    let mut prompt = format!(
        "Here are the most recent news headlines about {}:\n",
        ticker
    );
    for headline in headlines {
        let _ = writeln!(prompt, "- {}", headline.headline);
    }
    let _ = write!(
        prompt,
        "\nBased only on these headlines, describe the current sentiment around {} \
         (positive, negative or neutral) and give a short outlook in 3-4 sentences.",
        ticker
    );
    prompt
}

/// Narrative outlook for `ticker`. Never fails: missing news and provider
/// errors degrade to fixed messages.
pub async fn outlook(
    news: Option<&dyn NewsProvider>,
    llm: Option<&dyn LlmProvider>,
    ticker: &str,
) -> String {
    let headlines =
        news_service::recent_headlines(news, ticker, OUTLOOK_WINDOW_DAYS, OUTLOOK_HEADLINES).await;

    if headlines.is_empty() {
        info!("No headlines for {}, skipping LLM", ticker);
        return NO_NEWS_MESSAGE.to_string();
    }

    let Some(llm) = llm else {
        warn!("LLM provider not configured, cannot analyze {}", ticker);
        return ANALYSIS_FAILED_MESSAGE.to_string();
    };

    match llm.generate_completion(build_prompt(ticker, &headlines)).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("LLM returned an empty outlook for {}", ticker);
            ANALYSIS_FAILED_MESSAGE.to_string()
        }
        Err(e) => {
            warn!("LLM outlook for {} failed: {}", ticker, e);
            ANALYSIS_FAILED_MESSAGE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_every_headline() {
        let headlines = vec![
            Headline { headline: "Chipmaker beats estimates".into(), url: "https://a".into(), published_at: None },
            Headline { headline: "Supply concerns linger".into(), url: "https://b".into(), published_at: None },
        ];

        let prompt = build_prompt("NVDA", &headlines);
        assert!(prompt.contains("about NVDA"));
        assert!(prompt.contains("- Chipmaker beats estimates\n"));
        assert!(prompt.contains("- Supply concerns linger\n"));
        assert!(!prompt.contains("https://"));
    }

    use crate::testkit::{StubLlm, StubNews};

    fn headlines(n: usize) -> Vec<Headline> {
        (0..n)
            .map(|i| Headline {
                headline: format!("Headline {}", i),
                url: format!("https://news.example.com/{}", i),
                published_at: chrono::DateTime::from_timestamp(1_700_000_000 + i as i64, 0),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_no_headlines_skips_llm() {
        let news = StubNews::empty();
        let llm = StubLlm::replying("should not be used");

        let text = outlook(Some(&news), Some(&llm), "XYZ").await;

        assert_eq!(text, NO_NEWS_MESSAGE);
        assert_eq!(news.calls(), 1);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_news_failure_counts_as_no_news() {
        let llm = StubLlm::replying("unused");
        let text = outlook(Some(&StubNews::failing()), Some(&llm), "XYZ").await;

        assert_eq!(text, NO_NEWS_MESSAGE);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_prompt_uses_five_newest_headlines() {
        let news = StubNews::with_headlines(headlines(8));
        let llm = StubLlm::replying("Sentiment is mildly positive.");

        let text = outlook(Some(&news), Some(&llm), "ACME").await;

        assert_eq!(text, "Sentiment is mildly positive.");
        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].matches("\n- ").count(), OUTLOOK_HEADLINES);
        assert!(prompts[0].contains("Headline 7"));
        assert!(!prompts[0].contains("Headline 2"));
    }

    #[tokio::test]
    async fn test_llm_failure_degrades_to_fixed_message() {
        let news = StubNews::with_headlines(headlines(2));
        let text = outlook(Some(&news), Some(&StubLlm::failing()), "ACME").await;
        assert_eq!(text, ANALYSIS_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_llm_degrades_to_fixed_message() {
        let news = StubNews::with_headlines(headlines(2));
        let text = outlook(Some(&news), None, "ACME").await;
        assert_eq!(text, ANALYSIS_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_news_provider_means_no_news() {
        let llm = StubLlm::replying("unused");
        let text = outlook(None, Some(&llm), "ACME").await;
        assert_eq!(text, NO_NEWS_MESSAGE);
        assert_eq!(llm.calls(), 0);
    }
}
