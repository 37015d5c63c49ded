/// Quote of the day, picked deterministically from a built-in table and
/// cached in the local partition until the calendar date changes.
use serde::{Deserialize, Serialize};

use crate::cache::DateStamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

const QUOTES: &[(&str, &str)] = &[
    (
        "The best way to predict the future is to invent it.",
        "Alan Kay",
    ),
    (
        "Simplicity is the ultimate sophistication.",
        "Leonardo da Vinci",
    ),
    (
        "It always seems impossible until it's done.",
        "Nelson Mandela",
    ),
    (
        "What we think, we become.",
        "Buddha",
    ),
    (
        "Well begun is half done.",
        "Aristotle",
    ),
    (
        "The obstacle is the way.",
        "Marcus Aurelius",
    ),
    (
        "Whether you think you can or you think you can't, you're right.",
        "Henry Ford",
    ),
    (
        "The journey of a thousand miles begins with a single step.",
        "Lao Tzu",
    ),
    (
        "Stay hungry, stay foolish.",
        "Stewart Brand",
    ),
    (
        "Nothing will work unless you do.",
        "Maya Angelou",
    ),
    (
        "Action is the foundational key to all success.",
        "Pablo Picasso",
    ),
    (
        "If you want to go fast, go alone. If you want to go far, go together.",
        "African proverb",
    ),
];

/// Same date, same quote; the table rotates day by day.
pub fn quote_for(date: DateStamp) -> Quote {
    let (text, author) = QUOTES[date.ordinal() % QUOTES.len()];
    Quote {
        text: text.to_string(),
        author: author.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_date_yields_same_quote() {
        let today = DateStamp::new(2026, 8, 30);

        assert_eq!(quote_for(today), quote_for(today));
    }

    #[test]
    fn test_consecutive_days_rotate_through_table() {
        let quotes: Vec<Quote> = (1..=QUOTES.len() as u32)
            .map(|day| quote_for(DateStamp::new(2026, 9, day)))
            .collect();

        // A full table-length run visits every entry exactly once.
        for quote in &quotes {
            assert_eq!(quotes.iter().filter(|q| *q == quote).count(), 1);
        }
    }

    #[test]
    fn test_every_entry_has_text_and_author() {
        for (text, author) in QUOTES {
            assert!(!text.is_empty());
            assert!(!author.is_empty());
        }
    }
}
