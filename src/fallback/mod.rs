//! Offline answers used whenever the model is unreachable
//!
//! [`respond`] tries, in order: character counting, one binary arithmetic
//! expression, keyword topics, and finally a generic apology. It is pure and
//! always returns non-empty text.

mod arithmetic;
mod char_count;
mod topics;

pub use arithmetic::{format_number, parse_arithmetic, BinaryExpression, Operator};
pub use char_count::{char_breakdown, count_occurrences, parse_char_count, CharCountQuery};
pub use topics::{classify, Topic, DEFAULT_REPLY};

/// Deterministic answer for `question`
pub fn respond(question: &str) -> String {
    if let Some(query) = parse_char_count(question) {
        return char_count::answer(&query);
    }

    if let Some(reply) = parse_arithmetic(question).and_then(|expr| {
        expr.evaluate().map(|value| arithmetic::answer(&expr, value))
    }) {
        return reply;
    }

    match classify(question) {
        Some(topic) => topic.reply().to_string(),
        None => DEFAULT_REPLY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_count_takes_priority() {
        // Contains both a count question and a sum
        let reply = respond("how many r in Strawberry, and what is 2 + 2?");
        assert!(reply.contains("**3 times**"));
        assert!(!reply.contains("2 + 2 = 4"));
    }

    #[test]
    fn test_arithmetic() {
        let reply = respond("What is 25 + 17?");
        assert!(reply.contains("25 + 17 = 42"));
    }

    #[test]
    fn test_division_by_zero_falls_through() {
        assert_eq!(respond("what is 1 / 0"), DEFAULT_REPLY);
        assert_eq!(respond("can you help with 1 / 0"), topics::NAVIGATION_REPLY);
    }

    #[test]
    fn test_topics_and_default() {
        assert_eq!(respond("What services do you offer?"), topics::SERVICES_REPLY);
        assert_eq!(respond("How do I navigate the website?"), topics::NAVIGATION_REPLY);
        assert_eq!(respond("What is the weather today?"), DEFAULT_REPLY);
    }

    #[test]
    fn test_never_empty() {
        for question in ["", "   ", "?", "how many", "1 +", "ünïcödé"] {
            assert!(!respond(question).is_empty(), "empty reply for {:?}", question);
        }
    }
}
