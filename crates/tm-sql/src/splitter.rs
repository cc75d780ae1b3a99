//! Migration statement splitter.
//!
//! Migration bodies are split on `;`. A fragment whose single quotes, double
//! quotes, or parentheses do not balance is joined with the next one (the
//! semicolon was inside a literal or an expression) until the accumulated text
//! balances. This is a counting heuristic, not a tokenizer: it covers string
//! literals and argument lists that contain semicolons without a full parser.
//!
//! Dialects with procedural objects ([`Dialect::has_procedural_blocks`]) first
//! look for `CREATE [OR REPLACE] TRIGGER|FUNCTION|PROCEDURE|PACKAGE [BODY]`
//! bodies closed by a line holding only `/`. The first such body is emitted
//! whole; the text before it is split as plain SQL and the text after it is
//! split recursively.

use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use regex::Regex;
use std::sync::OnceLock;

/// Longest slice of an unterminated fragment quoted back in the error.
const FRAGMENT_PREVIEW_CHARS: usize = 80;

/// Split a migration body into trimmed, non-empty statements in source order.
///
/// An unterminated trailing fragment is an error rather than being dropped,
/// so a migration can never lose SQL silently.
pub fn split_statements(sql: &str, dialect: Dialect) -> SqlResult<Vec<String>> {
    if dialect.has_procedural_blocks() {
        split_procedural(sql)
    } else {
        split_balanced(sql)
    }
}

fn procedural_block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // `pre` is lazy so the first object body wins; a `CREATE` inside
        // that body stays in it. Later objects are found by recursing on `post`.
        Regex::new(
            r"(?is)\A(?P<pre>.*?)(?P<body>CREATE\s+(?:OR\s+REPLACE\s+)?(?:TRIGGER|FUNCTION|PROCEDURE|PACKAGE\s+BODY|PACKAGE)\b.*?)\n[ \t]*/(?:[ \t]*\r?\n|\z)(?P<post>.*)\z",
        )
        .expect("valid regex literal")
    })
}

fn split_procedural(sql: &str) -> SqlResult<Vec<String>> {
    let Some(caps) = procedural_block_pattern().captures(sql) else {
        return split_balanced(sql);
    };

    let mut statements = Vec::new();
    if let Some(pre) = caps.name("pre") {
        statements.extend(split_balanced(pre.as_str())?);
    }
    if let Some(body) = caps.name("body") {
        let body = body.as_str().trim();
        if !body.is_empty() {
            log::debug!("Keeping procedural object body as one statement");
            statements.push(body.to_string());
        }
    }
    if let Some(post) = caps.name("post") {
        statements.extend(split_procedural(post.as_str())?);
    }
    Ok(statements)
}

fn split_balanced(sql: &str) -> SqlResult<Vec<String>> {
    let mut statements = Vec::new();
    let mut pending = String::new();

    for fragment in sql.split(';') {
        if !pending.is_empty() {
            pending.push(';');
        }
        pending.push_str(fragment);

        if is_balanced(&pending) {
            let statement = pending.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            pending.clear();
        }
    }

    if !pending.is_empty() {
        return Err(SqlError::UnterminatedStatement {
            fragment: preview(pending.trim()),
        });
    }

    Ok(statements)
}

/// Even single and double quote counts, and as many `(` as `)`.
pub(crate) fn is_balanced(text: &str) -> bool {
    let (mut single, mut double, mut open, mut close) = (0usize, 0usize, 0usize, 0usize);
    for c in text.chars() {
        match c {
            '\'' => single += 1,
            '"' => double += 1,
            '(' => open += 1,
            ')' => close += 1,
            _ => {}
        }
    }
    single % 2 == 0 && double % 2 == 0 && open == close
}

fn preview(fragment: &str) -> String {
    let mut chars = fragment.chars();
    let head: String = chars.by_ref().take(FRAGMENT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
#[path = "splitter_test.rs"]
mod tests;
