//! Decoder for flat, percent-encoded `key=value` query strings.
//!
//! Keys may carry bracket suffixes that describe nesting:
//!
//! - `a=1` sets a scalar
//! - `a[]=1&a[]=2` appends to a sequence
//! - `a[x]=1&a[y]=2` builds a nested tree
//! - `a[][b]=1&a[][c]=2` builds a sequence of trees, starting a new element
//!   whenever the last element already holds the key
//!
//! # Example
//!
//! ```
//! use tubegrab_core::query::{QueryValue, decode};
//!
//! let tree = decode("title=Hello+World&tags[]=a&tags[]=b").unwrap();
//! assert_eq!(tree.get_str("title"), Some("Hello World"));
//! assert_eq!(
//!     tree.get("tags").and_then(QueryValue::as_sequence).map(<[_]>::len),
//!     Some(2)
//! );
//! ```

mod decode;
mod encode;
mod error;
mod tree;

pub use decode::{decode, unescape};
pub use encode::encode;
pub use error::QueryError;
pub use tree::{DecodedTree, QueryValue};
