use briefing_core::{Token, TokenizationError, Tokenizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Kanji,
    Katakana,
    Hiragana,
    Alphanumeric,
    Symbol,
    Space,
}

impl Script {
    fn of(c: char) -> Self {
        match c {
            '々' | '〆' | '\u{3400}'..='\u{4dbf}' | '\u{4e00}'..='\u{9fff}' | '\u{f900}'..='\u{faff}' => {
                Script::Kanji
            }
            '\u{30a0}'..='\u{30ff}' | '\u{31f0}'..='\u{31ff}' | '\u{ff66}'..='\u{ff9f}' => {
                Script::Katakana
            }
            '\u{3040}'..='\u{309f}' => Script::Hiragana,
            c if c.is_whitespace() => Script::Space,
            c if c.is_alphanumeric() => Script::Alphanumeric,
            _ => Script::Symbol,
        }
    }

    fn part_of_speech(&self) -> &'static str {
        match self {
            Script::Kanji | Script::Katakana | Script::Alphanumeric => "noun",
            Script::Hiragana => "particle",
            Script::Symbol | Script::Space => "symbol",
        }
    }
}

/// Dependency-free segmenter that splits text at script boundaries.
///
/// Runs of kanji, katakana and latin letters/digits are tagged as nouns,
/// hiragana runs as particles. This approximates a morphological analyzer
/// well enough for headline trend counting; a dictionary-based
/// implementation of [`Tokenizer`] can replace it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptTokenizer;

impl Tokenizer for ScriptTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizationError> {
        let mut tokens = Vec::new();
        let mut run = String::new();
        let mut run_script: Option<Script> = None;

        for c in text.chars() {
            if c == '\0' {
                return Err(TokenizationError(format!("NUL character in '{}'", text.replace('\0', ""))));
            }
            let script = Script::of(c);
            if run_script != Some(script) {
                flush(&mut tokens, &mut run, run_script);
                run_script = Some(script);
            }
            run.push(c);
        }
        flush(&mut tokens, &mut run, run_script);

        Ok(tokens)
    }
}

fn flush(tokens: &mut Vec<Token>, run: &mut String, script: Option<Script>) {
    if let Some(script) = script {
        if !run.is_empty() && script != Script::Space {
            tokens.push(Token::new(run.as_str(), script.part_of_speech()));
        }
    }
    run.clear();
}
