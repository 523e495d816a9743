//! Descendant enumeration over the tree.
//!
//! All traversals are lazy, pre-order and start fresh on every call.

use crate::parser::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Every node and token under `node`, starting with `node` itself.
pub fn descendants(node: &SyntaxNode) -> impl Iterator<Item = SyntaxElement> + use<> {
    node.descendants_with_tokens()
}

/// Every token under `node`, in document order.
pub fn tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + use<> {
    node.descendants_with_tokens()
        .filter_map(|element| element.into_token())
}

/// Tokens that are not whitespace, line breaks or code comments.
pub fn significant_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + use<> {
    tokens(node).filter(|token| !token.kind().is_trivia())
}

/// First node (in pre-order) satisfying `predicate`.
pub fn find_node(
    node: &SyntaxNode,
    mut predicate: impl FnMut(&SyntaxNode) -> bool,
) -> Option<SyntaxNode> {
    node.descendants().find(|candidate| predicate(candidate))
}

/// Every node of `kind` under `node`.
pub fn nodes_of_kind(
    node: &SyntaxNode,
    kind: SyntaxKind,
) -> impl Iterator<Item = SyntaxNode> + use<> {
    node.descendants().filter(move |candidate| candidate.kind() == kind)
}
