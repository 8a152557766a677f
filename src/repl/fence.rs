//! Fenced code block extraction.

use std::sync::OnceLock;

use regex::Regex;

use crate::{Error, Result};

/// Language tag that marks a block for execution.
pub const DEFAULT_FENCE_TAG: &str = "python-execute";

/// Matches ```` ```{tag} ... ``` ```` blocks, non-greedily and across lines.
#[derive(Debug, Clone)]
pub struct CodeFence {
    tag: String,
    pattern: Regex,
}

fn pattern_for(tag: &str) -> String {
    format!(r"(?s)```{}(.+?)```", regex::escape(tag))
}

fn default_fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&pattern_for(DEFAULT_FENCE_TAG)).expect("valid fence regex"))
}

/// Reason a tag cannot open a fence, if any.
pub(crate) fn tag_problem(tag: &str) -> Option<&'static str> {
    if tag.is_empty() {
        Some("must not be empty")
    } else if tag.chars().any(|c| c.is_whitespace() || c == '`') {
        Some("must not contain whitespace or backticks")
    } else {
        None
    }
}

impl CodeFence {
    pub fn new(tag: impl Into<String>) -> Result<Self> {
        let tag = tag.into();
        if let Some(problem) = tag_problem(&tag) {
            return Err(Error::config(format!("code fence tag '{}' {}", tag, problem)));
        }
        let pattern = Regex::new(&pattern_for(&tag))
            .map_err(|e| Error::config(format!("invalid code fence tag '{}': {}", tag, e)))?;
        Ok(Self { tag, pattern })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Bodies of all fenced blocks in source order. Text outside fences is ignored.
    pub fn extract<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.pattern
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect()
    }

    pub fn contains_code(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

impl Default for CodeFence {
    fn default() -> Self {
        Self {
            tag: DEFAULT_FENCE_TAG.to_string(),
            pattern: default_fence_regex().clone(),
        }
    }
}
