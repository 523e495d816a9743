//! Queries over the immutable syntax tree
//!
//! The tree itself is rowan's: green nodes store widths, and absolute ranges are
//! derived from the root. This module answers the positional questions editor
//! features ask:
//! - [`find_token`] - which token sits at an offset
//! - [`descendants`], [`tokens`], [`find_node`] - pre-order traversal

mod find;
mod traversal;

#[cfg(test)]
mod tests;

pub use find::find_token;
pub use traversal::{descendants, find_node, nodes_of_kind, significant_tokens, tokens};
