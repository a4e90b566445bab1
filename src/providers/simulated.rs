//! Word-by-word replay of a finished text

use std::time::Duration;

use super::FragmentStream;

/// Stream `text` one space-separated word at a time, each followed by a
/// space, waiting `delay` between words. Concatenating the fragments gives
/// `text` plus one trailing space.
pub fn simulated_stream(text: impl Into<String>, delay: Duration) -> FragmentStream {
    let words: Vec<String> = text.into().split(' ').map(|w| format!("{} ", w)).collect();

    Box::pin(async_stream::stream! {
        for (i, word) in words.into_iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            yield Ok(word);
        }
    })
}
