//! Intent router - maps a free-text prompt to exactly one tool invocation.
//!
//! Rules are evaluated in table order and the first rule whose predicate
//! matches decides the outcome, even when its extractor then finds nothing.
//! A prompt mentioning "cat's name" without either known sub-phrase is
//! therefore unrecognized; it never reaches the generic memory rules.

use baarez_common::calculator::{self, Calculation, Notation};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Key used by the built-in cat's name rule
pub const CAT_KEY: &str = "cat's name";

/// Value always saved by the built-in cat's name rule
pub const CAT_NAME: &str = "Fluffy";

// Spans end at the first '?' or at end of text, tolerating one trailing newline
static READ_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)what is my\s+(.+?)(?:\?|\n?\z)").unwrap());

static SAVE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)remember my\s+(.+?)\s+is\s+(.+?)(?:\?|\n?\z)").unwrap()
});

static SYMBOLIC_EXPR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\s*[-+*/]\s*[0-9]+").unwrap());

/// Words that mark a spelled-out calculation
const ARITHMETIC_WORDS: [&str; 4] = ["plus", "minus", "times", "calculate"];

/// Tools the router can select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    MemoryRead,
    MemorySave,
    Calculator,
}

impl Tool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MemoryRead => "memory_read",
            Self::MemorySave => "memory_save",
            Self::Calculator => "calculator",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified prompt with the arguments its tool needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ReadFact { key: String },
    SaveFact { key: String, value: String },
    Compute(Calculation),
}

impl Intent {
    pub fn tool(&self) -> Tool {
        match self {
            Self::ReadFact { .. } => Tool::MemoryRead,
            Self::SaveFact { .. } => Tool::MemorySave,
            Self::Compute(_) => Tool::Calculator,
        }
    }

    /// Argument as reported back to the caller
    pub fn tool_input(&self) -> String {
        match self {
            Self::ReadFact { key } | Self::SaveFact { key, .. } => key.clone(),
            Self::Compute(calc) => calc.to_string(),
        }
    }
}

/// Prompt text with its lowercased form computed once
pub struct Prompt<'a> {
    pub raw: &'a str,
    pub lower: String,
}

impl<'a> Prompt<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lower: raw.to_lowercase(),
        }
    }
}

/// One routing rule: a cheap predicate and the extractor it commits to
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&Prompt) -> bool,
    pub extract: fn(&Prompt) -> Option<Intent>,
}

/// Routing table, highest priority first
pub static RULES: [Rule; 5] = [
    Rule {
        name: "cat_name",
        matches: mentions_cat_name,
        extract: extract_cat_name,
    },
    Rule {
        name: "memory_read",
        matches: mentions_read,
        extract: extract_read,
    },
    Rule {
        name: "memory_save",
        matches: mentions_save,
        extract: extract_save,
    },
    Rule {
        name: "symbolic_arithmetic",
        matches: has_symbolic_expr,
        extract: extract_symbolic,
    },
    Rule {
        name: "spelled_arithmetic",
        matches: has_arithmetic_words,
        extract: extract_spelled,
    },
];

fn mentions_cat_name(p: &Prompt) -> bool {
    p.lower.contains(CAT_KEY)
}

fn mentions_read(p: &Prompt) -> bool {
    p.lower.contains("what is my")
}

fn mentions_save(p: &Prompt) -> bool {
    p.lower.contains("remember my")
}

fn has_symbolic_expr(p: &Prompt) -> bool {
    SYMBOLIC_EXPR.is_match(p.raw)
}

fn has_arithmetic_words(p: &Prompt) -> bool {
    ARITHMETIC_WORDS.iter().any(|w| p.lower.contains(w)) && calculator::has_digit(p.raw)
}

fn extract_cat_name(p: &Prompt) -> Option<Intent> {
    if p.lower.contains("what is my cat's name") {
        Some(Intent::ReadFact {
            key: CAT_KEY.to_string(),
        })
    } else if p.lower.contains("remember my cat's name") {
        Some(Intent::SaveFact {
            key: CAT_KEY.to_string(),
            value: CAT_NAME.to_string(),
        })
    } else {
        None
    }
}

fn extract_read(p: &Prompt) -> Option<Intent> {
    let caps = READ_KEY.captures(p.raw)?;
    Some(Intent::ReadFact {
        key: caps.get(1)?.as_str().trim().to_string(),
    })
}

fn extract_save(p: &Prompt) -> Option<Intent> {
    let caps = SAVE_PAIR.captures(p.raw)?;
    Some(Intent::SaveFact {
        key: caps.get(1)?.as_str().trim().to_string(),
        value: caps.get(2)?.as_str().trim().to_string(),
    })
}

fn extract_symbolic(p: &Prompt) -> Option<Intent> {
    Calculation::extract(p.raw, Notation::Symbolic).map(Intent::Compute)
}

fn extract_spelled(p: &Prompt) -> Option<Intent> {
    Calculation::extract(p.raw, Notation::Spelled).map(Intent::Compute)
}

/// First rule whose predicate matches the prompt
pub fn matching_rule(prompt: &str) -> Option<&'static Rule> {
    let p = Prompt::new(prompt);
    RULES.iter().find(|rule| (rule.matches)(&p))
}

/// Classify a prompt. `None` means no tool is available for it.
pub fn route(prompt: &str) -> Option<Intent> {
    let p = Prompt::new(prompt);
    let rule = RULES.iter().find(|rule| (rule.matches)(&p))?;
    let intent = (rule.extract)(&p);

    debug!(
        "Router: rule={}, intent={:?}",
        rule.name,
        intent.as_ref().map(Intent::tool)
    );
    intent
}
