//! "How many X in Y" questions

use once_cell::sync::Lazy;
use regex::Regex;

static CHAR_COUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)how many ['"]?(\w)['"]? in ['"]?(\w+)['"]?"#).expect("char count pattern")
});

/// A parsed character-count question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharCountQuery {
    pub target_char: char,
    pub word: String,
}

/// Extract the character and word from a "how many X in Y" question.
/// Quotes around either part are optional and matching ignores case.
pub fn parse_char_count(message: &str) -> Option<CharCountQuery> {
    let caps = CHAR_COUNT_RE.captures(message)?;
    let target_char = caps.get(1)?.as_str().chars().next()?;
    let word = caps.get(2)?.as_str().to_string();

    Some(CharCountQuery { target_char, word })
}

fn same_letter(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Case-insensitive number of occurrences of `target` in `word`
pub fn count_occurrences(word: &str, target: char) -> usize {
    word.chars().filter(|&c| same_letter(c, target)).count()
}

/// Letters of `word` joined with `-`, matches tagged with their 1-based
/// position: `S-t-r(3)-a-w-b-e-r(8)-r(9)-y`
pub fn char_breakdown(word: &str, target: char) -> String {
    word.chars()
        .enumerate()
        .map(|(i, c)| {
            if same_letter(c, target) {
                format!("{}({})", c, i + 1)
            } else {
                c.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

pub(crate) fn answer(query: &CharCountQuery) -> String {
    let count = count_occurrences(&query.word, query.target_char);
    let times = if count == 1 { "time" } else { "times" };

    format!(
        "Hi! I'm Machan. Even though I'm experiencing connectivity issues, I can help with this!\n\n\
         In the word \"{word}\", the letter '{ch}' appears **{count} {times}**.\n\n\
         Let me break it down: {breakdown}\n\n\
         This demonstrates the kind of analytical capabilities I provide! Once I'm back online, \
         I can help with more complex questions about our AI Workflow Hub.",
        word = query.word,
        ch = query.target_char,
        count = count,
        times = times,
        breakdown = char_breakdown(&query.word, query.target_char),
    )
}
