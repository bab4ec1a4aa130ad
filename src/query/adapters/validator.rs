//! Regex-based SQL validator.
//!
//! Comments and string literals are blanked before any rule runs, so a
//! keyword quoted inside `'...'` or hidden after `--` never trips the
//! DDL/DML check.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

use crate::query::ports::{QueryValidationError, QueryValidator};

static NON_CODE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r#"'(?:''|[^'])*'|"(?:""|[^"])*"|--[^\n]*|/\*[\s\S]*?\*/"#)
});

static DDL_DML: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)\b(INSERT|UPDATE|DELETE|DROP|CREATE|ALTER|TRUNCATE|REPLACE|GRANT|REVOKE)\b")
});

#[expect(
    clippy::expect_used,
    reason = "patterns are string literals exercised by the module tests"
)]
fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("validator pattern should compile")
}

/// Validator accepting single read-only `SELECT`/`WITH` queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlQueryValidator;

impl SqlQueryValidator {
    /// Creates a validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Replaces literals with empty literals and comments with a space.
fn strip_non_code(query: &str) -> Cow<'_, str> {
    NON_CODE.replace_all(query, |captures: &Captures<'_>| {
        let matched = captures.get(0).map_or("", |m| m.as_str());
        if matched.starts_with('\'') {
            "''"
        } else if matched.starts_with('"') {
            "\"\""
        } else {
            " "
        }
    })
}

fn is_balanced(code: &str) -> bool {
    let mut depth = 0_usize;
    let mut open_quote: Option<char> = None;
    for ch in code.chars() {
        if let Some(quote) = open_quote {
            if ch == quote {
                open_quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => open_quote = Some(ch),
            '(' => depth += 1,
            ')' => {
                let Some(next) = depth.checked_sub(1) else {
                    return false;
                };
                depth = next;
            }
            _ => {}
        }
    }
    depth == 0 && open_quote.is_none()
}

fn leading_keyword(code: &str) -> &str {
    code.trim_start()
        .split(|c: char| !c.is_ascii_alphabetic())
        .next()
        .unwrap_or_default()
}

impl QueryValidator for SqlQueryValidator {
    fn is_safe(&self, query: &str) -> Result<bool, QueryValidationError> {
        let code = strip_non_code(query);
        if code.trim().is_empty() {
            return Err(QueryValidationError::Empty);
        }
        if let Some(keyword) = DDL_DML.find(&code) {
            return Err(QueryValidationError::DdlDml(
                keyword.as_str().to_ascii_uppercase(),
            ));
        }
        let keyword = leading_keyword(&code);
        if !keyword.eq_ignore_ascii_case("SELECT") && !keyword.eq_ignore_ascii_case("WITH") {
            return Err(QueryValidationError::NotReadOnly);
        }
        if !is_balanced(&code) {
            return Err(QueryValidationError::Unbalanced);
        }
        Ok(true)
    }

    fn contains_ddl_dml(&self, query: &str) -> bool {
        DDL_DML.is_match(&strip_non_code(query))
    }
}
