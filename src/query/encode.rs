//! Inverse of [`decode`](super::decode) for trees with string leaves.

use super::tree::{DecodedTree, QueryValue};

/// Encodes a tree back into a query string.
///
/// Nested trees become `key[sub]=...`, sequences become `key[]=...` and
/// sequences of trees become `key[][sub]=...`. Keys and values are
/// percent-encoded. A tree element that follows another tree element leads
/// with a key the two share, so the decoder starts a new element there.
///
/// Empty trees and empty sequences produce no pairs, so they are dropped
/// and an empty tree encodes to the empty string.
///
/// Decoding the result yields an equal tree when:
///
/// - every key is non-empty and free of `[`, `]` and surrounding quotes
/// - top-level keys contain no `.` or space (the decoder rewrites them to `_`)
/// - no tree or sequence is empty, and no sequence directly holds a sequence
/// - adjacent tree elements of a sequence share a key
/// - every value inside a tree element of a sequence encodes to one pair
///
/// Outside those bounds the output still decodes, to a different tree.
/// `a[][]=1` decodes to `a` holding an empty tree, which encodes to `""`.
/// `a[b.c=1` decodes to the key `a_b.c`, which decodes again as `a_b_c`.
#[must_use]
pub fn encode(tree: &DecodedTree) -> String {
    let mut pairs = Vec::new();
    for (key, value) in tree.iter() {
        encode_value(&escape(key), value, &mut pairs);
    }
    pairs.join("&")
}

fn encode_value(prefix: &str, value: &QueryValue, pairs: &mut Vec<String>) {
    match value {
        QueryValue::Scalar(scalar) => pairs.push(format!("{prefix}={}", escape(scalar))),
        QueryValue::Sequence(items) => {
            let item_prefix = format!("{prefix}[]");
            let mut previous: Option<&DecodedTree> = None;
            for item in items {
                match item {
                    QueryValue::Tree(element) => {
                        encode_element(&item_prefix, element, previous, pairs);
                        previous = Some(element);
                    }
                    other => {
                        encode_value(&item_prefix, other, pairs);
                        previous = None;
                    }
                }
            }
        }
        QueryValue::Tree(child) => encode_entries(prefix, child.iter(), pairs),
    }
}

/// Emits one tree element of a sequence, moving a key shared with the
/// preceding tree element to the front.
fn encode_element(
    prefix: &str,
    element: &DecodedTree,
    previous: Option<&DecodedTree>,
    pairs: &mut Vec<String>,
) {
    let lead = previous.and_then(|prev| element.keys().find(|key| prev.contains_key(key)));
    let Some(lead) = lead else {
        encode_entries(prefix, element.iter(), pairs);
        return;
    };
    let ordered = element
        .iter()
        .filter(|(key, _)| *key == lead)
        .chain(element.iter().filter(|(key, _)| *key != lead));
    encode_entries(prefix, ordered, pairs);
}

fn encode_entries<'a>(
    prefix: &str,
    entries: impl Iterator<Item = (&'a str, &'a QueryValue)>,
    pairs: &mut Vec<String>,
) {
    for (key, nested) in entries {
        encode_value(&format!("{prefix}[{}]", escape(key)), nested, pairs);
    }
}

fn escape(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}
