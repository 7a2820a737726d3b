//! Keyword sentiment over news headlines

use crate::aggregators::MarketMood;
use crate::types::NewsItem;
use serde::{Deserialize, Serialize};

const POSITIVE_KEYWORDS: &[&str] = &[
    "rise", "rises", "gain", "gains", "up", "high", "strong", "bullish", "positive",
    "growth", "increase", "rally", "surge", "boom", "profit", "beat",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "fall", "falls", "drop", "drops", "down", "low", "weak", "bearish", "negative",
    "decline", "decrease", "crash", "plunge", "slump", "loss", "miss",
];

/// Sentiment label for one piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

/// Keyword counts for one headline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSentiment {
    pub label: SentimentLabel,
    /// Net keyword count for the winning side
    pub score: usize,
    pub positive_count: usize,
    pub negative_count: usize,
}

/// Classify text by whole-word keyword matches
pub fn analyze_text(text: &str) -> TextSentiment {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let positive_count = words.iter().filter(|w| POSITIVE_KEYWORDS.contains(*w)).count();
    let negative_count = words.iter().filter(|w| NEGATIVE_KEYWORDS.contains(*w)).count();

    let (label, score) = if positive_count > negative_count {
        (SentimentLabel::Positive, positive_count - negative_count)
    } else if negative_count > positive_count {
        (SentimentLabel::Negative, negative_count - positive_count)
    } else {
        (SentimentLabel::Neutral, 0)
    };

    TextSentiment {
        label,
        score,
        positive_count,
        negative_count,
    }
}

/// Headline with its classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHeadline {
    pub title: String,
    pub provider: Option<String>,
    pub sentiment: TextSentiment,
}

/// Aggregate news sentiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsSentiment {
    pub overall: MarketMood,
    /// Share of the dominant side in percent, 50 when balanced
    pub confidence: f64,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub headlines: Vec<ScoredHeadline>,
}

impl NewsSentiment {
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

/// Classify every headline and summarize. `None` when there is no news.
pub fn summarize(news: &[NewsItem]) -> Option<NewsSentiment> {
    if news.is_empty() {
        return None;
    }

    let headlines: Vec<ScoredHeadline> = news
        .iter()
        .map(|item| ScoredHeadline {
            title: item.title.clone(),
            provider: item.provider.clone(),
            sentiment: analyze_text(&item.text()),
        })
        .collect();

    let count = |label: SentimentLabel| headlines.iter().filter(|h| h.sentiment.label == label).count();
    let positive = count(SentimentLabel::Positive);
    let negative = count(SentimentLabel::Negative);
    let neutral = count(SentimentLabel::Neutral);
    let total = headlines.len() as f64;

    let (overall, confidence) = if positive > negative {
        (MarketMood::Bullish, positive as f64 / total * 100.0)
    } else if negative > positive {
        (MarketMood::Bearish, negative as f64 / total * 100.0)
    } else {
        (MarketMood::Neutral, 50.0)
    };

    Some(NewsSentiment {
        overall,
        confidence,
        positive,
        negative,
        neutral,
        headlines,
    })
}
