//! Headline analysis: watch-list scanning and trending-noun extraction.

pub mod aggregator;
pub mod tokenizer;
pub mod watcher;

pub use aggregator::TrendAggregator;
pub use tokenizer::ScriptTokenizer;
pub use watcher::KeywordWatcher;
