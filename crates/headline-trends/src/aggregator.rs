use std::collections::HashMap;

use briefing_core::{Headline, Token, Tokenizer, TrendEntry, TrendSettings};

/// Counts nouns across a headline batch and ranks the most frequent
#[derive(Debug, Clone, Default)]
pub struct TrendAggregator {
    settings: TrendSettings,
}

struct WordStats {
    count: usize,
    first_seen: usize,
}

impl TrendAggregator {
    pub fn new(settings: TrendSettings) -> Self {
        Self { settings }
    }

    pub fn top_k(&self) -> usize {
        self.settings.top_k
    }

    /// Rank trending nouns.
    ///
    /// Count descending; ties go to the word seen first across the ordered
    /// headline stream. At most `top_k` entries. A headline the tokenizer
    /// rejects contributes nothing.
    pub fn aggregate(&self, headlines: &[Headline], tokenizer: &dyn Tokenizer) -> Vec<TrendEntry> {
        let mut stats: HashMap<String, WordStats> = HashMap::new();
        let mut position = 0usize;

        for headline in headlines {
            let tokens = match tokenizer.tokenize(&headline.title) {
                Ok(tokens) => tokens,
                Err(e) => {
                    tracing::warn!("Skipping headline from {}: {}", headline.source, e);
                    continue;
                }
            };

            for token in tokens.into_iter().filter(|t| self.keeps(t)) {
                stats
                    .entry(token.surface)
                    .and_modify(|s| s.count += 1)
                    .or_insert(WordStats {
                        count: 1,
                        first_seen: position,
                    });
                position += 1;
            }
        }

        let mut ranked: Vec<(String, WordStats)> = stats.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });
        ranked.truncate(self.settings.top_k);

        ranked
            .into_iter()
            .map(|(word, s)| TrendEntry { word, count: s.count })
            .collect()
    }

    /// Nouns longer than one character, not all digits, not stopwords
    fn keeps(&self, token: &Token) -> bool {
        token.is_noun()
            && token.surface.chars().count() > 1
            && !token.surface.chars().all(is_decimal_digit)
            && !self.settings.stopwords.contains(&token.surface)
    }
}

/// ASCII or full-width `0-9`. Kanji numerals and roman numerals are words.
fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit() || ('０'..='９').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefing_core::TokenizationError;

    /// Splits on whitespace; words starting with '~' are particles, "FAIL" fails the line
    struct WhitespaceTokenizer;

    impl Tokenizer for WhitespaceTokenizer {
        fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizationError> {
            if text.contains("FAIL") {
                return Err(TokenizationError("dictionary not loaded".to_string()));
            }
            Ok(text
                .split_whitespace()
                .map(|w| match w.strip_prefix('~') {
                    Some(rest) => Token::new(rest, "particle"),
                    None => Token::new(w, "noun"),
                })
                .collect())
        }
    }

    fn headlines(titles: &[&str]) -> Vec<Headline> {
        titles.iter().map(|t| Headline::new(*t, "test")).collect()
    }

    fn aggregator(top_k: usize, stopwords: &[&str]) -> TrendAggregator {
        TrendAggregator::new(TrendSettings {
            stopwords: stopwords.iter().map(|s| s.to_string()).collect(),
            top_k,
        })
    }

    fn pairs(entries: &[TrendEntry]) -> Vec<(&str, usize)> {
        entries.iter().map(|e| (e.word.as_str(), e.count)).collect()
    }

    #[test]
    fn test_ranks_by_count_then_first_occurrence() {
        let trends = aggregator(2, &[]).aggregate(
            &headlines(&["AA AA", "BB CC", "CC CC"]),
            &WhitespaceTokenizer,
        );
        assert_eq!(pairs(&trends), vec![("CC", 3), ("AA", 2)]);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let trends = aggregator(5, &[]).aggregate(
            &headlines(&["ZZ YY", "XX", "YY ZZ XX"]),
            &WhitespaceTokenizer,
        );
        assert_eq!(pairs(&trends), vec![("ZZ", 2), ("YY", 2), ("XX", 2)]);
    }

    #[test]
    fn test_filters_short_numeric_stopword_and_non_nouns() {
        let trends = aggregator(5, &["市場"]).aggregate(
            &headlines(&["A 2024 市場 ~した 半導体 １２"]),
            &WhitespaceTokenizer,
        );
        assert_eq!(pairs(&trends), vec![("半導体", 1)]);
    }

    #[test]
    fn test_only_decimal_digit_runs_count_as_numbers() {
        let trends = aggregator(5, &[]).aggregate(
            &headlines(&["2024 ２０２４ 〇〇 ⅢⅣ ½½"]),
            &WhitespaceTokenizer,
        );
        assert_eq!(pairs(&trends), vec![("〇〇", 1), ("ⅢⅣ", 1), ("½½", 1)]);
    }

    #[test]
    fn test_tokenizer_failure_skips_only_that_headline() {
        let trends = aggregator(5, &[]).aggregate(
            &headlines(&["FAIL chips chips", "chips fabs"]),
            &WhitespaceTokenizer,
        );
        assert_eq!(pairs(&trends), vec![("chips", 1), ("fabs", 1)]);
    }

    #[test]
    fn test_empty_headlines() {
        assert!(TrendAggregator::default()
            .aggregate(&[], &WhitespaceTokenizer)
            .is_empty());
    }

    #[test]
    fn test_never_exceeds_top_k() {
        let trends = aggregator(3, &[]).aggregate(
            &headlines(&["aa bb cc dd ee ff"]),
            &WhitespaceTokenizer,
        );
        assert_eq!(trends.len(), 3);
    }
}
