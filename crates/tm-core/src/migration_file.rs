//! The `.migration` file format.
//!
//! A migration file is a sequence of assignments of string literals:
//!
//! ```text
//! #-*- coding: utf-8 -*-
//! SQL_UP = u"""
//! create table spam (id int);
//! """
//! SQL_DOWN = u"""
//! drop table spam;
//! """
//! ```
//!
//! Literals may be `"""`, `'''`, `"` or `'` quoted, with an optional `u` or
//! `r` prefix. Backslash escapes are decoded except in `r` literals. Lines
//! starting with `#` are comments. Only `SQL_UP` and `SQL_DOWN` are read;
//! other assignments are allowed and ignored.

use crate::encoding::FileEncoding;
use crate::error::{CoreError, CoreResult};
use crate::migration::Migration;
use crate::version::Version;
use chrono::{Local, NaiveDateTime, Utc};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Extension of migration files, without the dot
pub const MIGRATION_EXTENSION: &str = "migration";

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

fn file_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(?P<version>\d{14})_(?P<title>\w+)\.migration$")
            .expect("valid regex literal")
    })
}

fn assignment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\A(?P<name>[A-Za-z_][A-Za-z0-9_]*)[ \t]*=[ \t]*(?P<prefix>[uUrR]{0,2})(?P<quote>"""|'''|"|')"#)
            .expect("valid regex literal")
    })
}

/// Whether `file_name` has the `YYYYMMDDHHMMSS_title.migration` shape.
pub fn is_migration_file_name(file_name: &str) -> bool {
    file_name_pattern().is_match(file_name)
}

/// Split a migration file name into its version and title.
pub fn parse_file_name(file_name: &str) -> CoreResult<(Version, String)> {
    let caps = file_name_pattern()
        .captures(file_name)
        .ok_or_else(|| CoreError::InvalidFilename {
            name: file_name.to_string(),
        })?;
    let version = Version::try_new(&caps["version"]).ok_or_else(|| CoreError::InvalidFilename {
        name: file_name.to_string(),
    })?;
    Ok((version, caps["title"].to_string()))
}

/// The two SQL bodies found in a migration source.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MigrationBodies {
    pub sql_up: Option<String>,
    pub sql_down: Option<String>,
}

/// Parse the assignments of a decoded migration file.
///
/// Errors carry a 1-based line number and a reason.
pub fn parse_source(source: &str) -> Result<MigrationBodies, String> {
    let mut bodies = MigrationBodies::default();
    let mut pos = 0;

    loop {
        pos = skip_blank_and_comments(source, pos);
        if pos >= source.len() {
            break;
        }
        let line = line_of(source, pos);
        let rest = &source[pos..];
        let caps = assignment_pattern().captures(rest).ok_or_else(|| {
            format!("line {line}: expected NAME = \"\"\"...\"\"\" assignment")
        })?;

        let name = caps["name"].to_string();
        let raw = caps["prefix"].contains(['r', 'R']);
        let quote = caps["quote"].to_string();
        let body_start = pos + caps[0].len();

        let body_len = find_closing(&source[body_start..], &quote)
            .ok_or_else(|| format!("line {line}: unterminated string for {name}"))?;
        let literal = &source[body_start..body_start + body_len];
        let value = if raw {
            literal.to_string()
        } else {
            unescape(literal)
        };
        pos = body_start + body_len + quote.len();

        let tail_end = source[pos..].find('\n').map_or(source.len(), |i| pos + i);
        let tail = source[pos..tail_end].trim();
        if !tail.is_empty() && !tail.starts_with('#') {
            return Err(format!(
                "line {}: unexpected text after {name}: {tail}",
                line_of(source, pos)
            ));
        }
        pos = tail_end;

        match name.as_str() {
            "SQL_UP" => bodies.sql_up = Some(value),
            "SQL_DOWN" => bodies.sql_down = Some(value),
            other => log::debug!("Ignoring assignment to {other}"),
        }
    }

    Ok(bodies)
}

fn skip_blank_and_comments(source: &str, mut pos: usize) -> usize {
    let bytes = source.as_bytes();
    while pos < bytes.len() {
        match bytes[pos] {
            b' ' | b'\t' | b'\r' | b'\n' => pos += 1,
            b'#' => {
                pos = source[pos..].find('\n').map_or(source.len(), |i| pos + i);
            }
            _ => break,
        }
    }
    pos
}

fn line_of(source: &str, pos: usize) -> usize {
    source[..pos].matches('\n').count() + 1
}

/// Byte offset of the closing quote. A backslash always shields the next
/// byte, even in raw literals. Single-quoted literals end at a newline.
fn find_closing(body: &str, quote: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let quote = quote.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i..].starts_with(quote) {
            return Some(i);
        }
        if quote.len() == 1 && bytes[i] == b'\n' {
            return None;
        }
        i += 1;
    }
    None
}

fn unescape(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Read a migration file into a [`Migration`].
pub fn load(path: &Path, encoding: FileEncoding) -> CoreResult<Migration> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (version, title) = parse_file_name(&file_name)?;

    if !path.is_file() {
        return Err(CoreError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let malformed = |reason: String| CoreError::MalformedMigration {
        path: path.display().to_string(),
        reason,
    };

    let bytes = std::fs::read(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    let source = encoding.decode(&bytes).map_err(malformed)?;
    let bodies = parse_source(&source).map_err(malformed)?;

    let sql_up = required_body(bodies.sql_up, "SQL_UP").map_err(malformed)?;
    let sql_down = required_body(bodies.sql_down, "SQL_DOWN").map_err(malformed)?;

    Ok(Migration {
        id: None,
        version,
        title,
        file_name,
        abs_path: Some(std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())),
        sql_up,
        sql_down,
        label: None,
    })
}

fn required_body(body: Option<String>, name: &str) -> Result<String, String> {
    match body {
        None => Err(format!("{name} is missing")),
        Some(sql) if sql.trim().is_empty() => Err(format!("{name} is empty")),
        Some(sql) => Ok(sql),
    }
}

/// Create a new, empty migration file in `dir` stamped with the current time.
pub fn create(
    name: &str,
    dir: &Path,
    encoding: FileEncoding,
    utc_timestamp: bool,
) -> CoreResult<std::path::PathBuf> {
    let now = if utc_timestamp {
        Utc::now().naive_utc()
    } else {
        Local::now().naive_local()
    };
    create_at(name, dir, encoding, now)
}

/// [`create`] with an explicit timestamp.
pub fn create_at(
    name: &str,
    dir: &Path,
    encoding: FileEncoding,
    timestamp: NaiveDateTime,
) -> CoreResult<std::path::PathBuf> {
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(CoreError::InvalidName {
            name: name.to_string(),
        });
    }

    std::fs::create_dir_all(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    let file_name = format!(
        "{}_{name}.{MIGRATION_EXTENSION}",
        timestamp.format(TIMESTAMP_FORMAT)
    );
    let path = dir.join(file_name);
    if path.exists() {
        return Err(CoreError::MigrationExists {
            path: path.display().to_string(),
        });
    }

    let template = template(encoding);
    let bytes = encoding
        .encode(&template)
        .map_err(|reason| CoreError::MalformedMigration {
            path: path.display().to_string(),
            reason,
        })?;
    std::fs::write(&path, bytes).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    log::info!("Created migration {}", path.display());
    Ok(path)
}

fn template(encoding: FileEncoding) -> String {
    format!(
        "#-*- coding: {} -*-\n\nSQL_UP = u\"\"\"\n\n\"\"\"\n\nSQL_DOWN = u\"\"\"\n\n\"\"\"\n",
        encoding.name()
    )
}

#[cfg(test)]
#[path = "migration_file_test.rs"]
mod tests;
