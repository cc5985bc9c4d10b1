//! Query string decoding into a [`DecodedTree`].

use tracing::trace;

use super::error::QueryError;
use super::tree::{DecodedTree, QueryValue};

/// Decodes a `&`-separated query string into a nested tree.
///
/// Entries without `=` (or with `=` in first position) are skipped, as are
/// keys that are empty after stripping leading spaces or that start with `[`.
/// An empty value is still stored.
///
/// # Errors
///
/// Returns [`QueryError::InvalidEscape`] or [`QueryError::InvalidUtf8`] for
/// malformed percent-encoding, and [`QueryError::TypeMismatch`] when a key's
/// bracket suffix conflicts with a value already stored under it.
#[tracing::instrument(level = "trace", skip(input), fields(input_len = input.len()))]
pub fn decode(input: &str) -> Result<DecodedTree, QueryError> {
    let mut tree = DecodedTree::new();

    for part in input.split('&') {
        let Some(pos) = part.find('=') else {
            continue;
        };
        if pos == 0 {
            continue;
        }

        let raw_key = unescape(&part[..pos])?;
        let key = raw_key.trim_start_matches(' ');
        if key.is_empty() || key.starts_with('[') {
            continue;
        }
        let value = unescape(&part[pos + 1..])?;

        let path = parse_key_path(key);
        trace!(key, ?path, "decoded query key");
        insert(&mut tree, &path, value)?;
    }

    Ok(tree)
}

/// Percent-decodes one query component with form semantics (`+` is a space).
///
/// # Errors
///
/// Returns [`QueryError::InvalidEscape`] when `%` is not followed by two hex
/// digits, and [`QueryError::InvalidUtf8`] when the decoded bytes are not UTF-8.
pub fn unescape(input: &str) -> Result<String, QueryError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        match bytes[index] {
            b'%' => {
                let high = bytes.get(index + 1).copied().and_then(hex_value);
                let low = bytes.get(index + 2).copied().and_then(hex_value);
                let (Some(high), Some(low)) = (high, low) else {
                    let end = (index + 3).min(bytes.len());
                    return Err(QueryError::invalid_escape(String::from_utf8_lossy(
                        &bytes[index..end],
                    )));
                };
                out.push((high << 4) | low);
                index += 3;
            }
            b'+' => {
                out.push(b' ');
                index += 1;
            }
            other => {
                out.push(other);
                index += 1;
            }
        }
    }

    String::from_utf8(out).map_err(|_| QueryError::invalid_utf8(input))
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Splits a decoded key into its base segment and bracket components.
///
/// Only the first `[` of a group opens a component; a closing `]` followed by
/// anything other than `[` ends parsing, dropping the trailing text.
fn parse_key_path(key: &str) -> Vec<String> {
    let mut path: Vec<String> = Vec::new();
    let mut open: Option<usize> = None;

    for (index, ch) in key.char_indices() {
        match ch {
            '[' if open.is_none() => open = Some(index),
            ']' => {
                if let Some(start) = open.take() {
                    if path.is_empty() {
                        path.push(key[..start].to_string());
                    }
                    path.push(key[start + 1..index].to_string());
                    if key[index + 1..].chars().next().is_some_and(|next| next != '[') {
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    if path.is_empty() {
        path.push(key.to_string());
    }
    path[0] = normalize_base(&path[0]);
    path
}

/// Replaces spaces, dots and the first `[` in the base segment with `_`.
/// Everything after that `[` is kept verbatim.
fn normalize_base(base: &str) -> String {
    let mut normalized = String::with_capacity(base.len());
    for (index, ch) in base.char_indices() {
        match ch {
            ' ' | '.' => normalized.push('_'),
            '[' => {
                normalized.push('_');
                normalized.push_str(&base[index + 1..]);
                break;
            }
            _ => normalized.push(ch),
        }
    }
    normalized
}

fn trim_quotes(component: &str) -> &str {
    component.trim_matches(|c| c == '\'' || c == '"')
}

fn insert(tree: &mut DecodedTree, path: &[String], value: String) -> Result<(), QueryError> {
    let Some((first, rest)) = path.split_first() else {
        return Ok(());
    };
    let key = trim_quotes(first);

    match rest {
        [] => {
            tree.insert(key, QueryValue::Scalar(value));
            Ok(())
        }
        [marker] if marker.is_empty() => {
            if key.is_empty() {
                return Ok(());
            }
            match tree.get_or_insert_with(key, || QueryValue::Sequence(Vec::new())) {
                QueryValue::Sequence(items) => {
                    items.push(QueryValue::Scalar(value));
                    Ok(())
                }
                other => Err(QueryError::type_mismatch(key, "sequence", other.kind())),
            }
        }
        [marker, next, ..] if marker.is_empty() && !next.is_empty() => {
            let items = match tree.get_or_insert_with(key, || QueryValue::Sequence(Vec::new())) {
                QueryValue::Sequence(items) => items,
                other => return Err(QueryError::type_mismatch(key, "sequence", other.kind())),
            };
            let element_path = &rest[1..];

            if let Some(QueryValue::Tree(last)) = items.last_mut()
                && !last.contains_key(trim_quotes(next))
            {
                return insert(last, element_path, value);
            }

            let mut element = DecodedTree::new();
            insert(&mut element, element_path, value)?;
            items.push(QueryValue::Tree(element));
            Ok(())
        }
        _ => match tree.get_or_insert_with(key, || QueryValue::Tree(DecodedTree::new())) {
            QueryValue::Tree(child) => insert(child, rest, value),
            other => Err(QueryError::type_mismatch(key, "tree", other.kind())),
        },
    }
}
