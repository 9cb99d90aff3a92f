use briefing_core::{Headline, WatchList};

/// Flags watch-list keywords that appear in headlines
#[derive(Debug, Clone, Default)]
pub struct KeywordWatcher {
    watch_list: WatchList,
}

impl KeywordWatcher {
    pub fn new(watch_list: WatchList) -> Self {
        Self { watch_list }
    }

    /// Keywords found in any title, each once, in order of first match.
    ///
    /// Matching is case-sensitive substring containment. Headlines are
    /// visited in the given order and, within a headline, keywords in
    /// watch-list order.
    pub fn scan(&self, headlines: &[Headline]) -> Vec<String> {
        let mut hits: Vec<String> = Vec::new();
        for headline in headlines {
            for keyword in self.watch_list.keywords() {
                if headline.title.contains(keyword.as_str()) && !hits.contains(keyword) {
                    tracing::debug!("Watch keyword '{}' hit in: {}", keyword, headline.title);
                    hits.push(keyword.clone());
                }
            }
        }
        hits
    }
}
