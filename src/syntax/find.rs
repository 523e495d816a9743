//! Token lookup by offset.

use rowan::NodeOrToken;

use crate::base::TextSize;
use crate::parser::{SyntaxKind, SyntaxNode, SyntaxToken};

/// The token at `position` under `root`.
///
/// Positions at or past the end resolve to the last token (`END_OF_FILE` for a
/// parsed document). Ranges are half-open, so on a boundary the later token wins
/// and zero-width tokens never match.
///
/// Unless `include_whitespace` is set, whitespace resolves to a nearby meaningful
/// token:
/// - whitespace after a token on the same line resolves to that token;
/// - a line break resolves to the whitespace (or token) ending its line, looking
///   back across blank lines;
/// - leading whitespace resolves to the next token that is not whitespace.
///
/// Returns `None` only when `root` holds no token at all.
pub fn find_token(
    root: &SyntaxNode,
    position: TextSize,
    include_whitespace: bool,
) -> Option<SyntaxToken> {
    let range = root.text_range();
    let token = if position >= range.end() {
        root.last_token()?
    } else {
        token_containing(root, position.max(range.start()))?
    };

    if include_whitespace {
        return Some(token);
    }
    Some(match token.kind() {
        SyntaxKind::WHITESPACE => match previous_non_empty(&token) {
            Some(prev) if !prev.kind().is_whitespace() => prev,
            _ => next_significant(token),
        },
        SyntaxKind::NEW_LINE => {
            let mut prev = previous_non_empty(&token);
            while let Some(line_break) = prev.take_if(|p| p.kind() == SyntaxKind::NEW_LINE) {
                prev = previous_non_empty(&line_break);
            }
            match prev {
                Some(prev) => prev,
                None => next_significant(token),
            }
        }
        _ => token,
    })
}

/// Top-down descent through the children whose range contains `position`.
fn token_containing(root: &SyntaxNode, position: TextSize) -> Option<SyntaxToken> {
    let mut node = root.clone();
    loop {
        let child = node
            .children_with_tokens()
            .find(|child| child.text_range().contains(position))?;
        match child {
            NodeOrToken::Token(token) => return Some(token),
            NodeOrToken::Node(child) => node = child,
        }
    }
}

fn previous_non_empty(token: &SyntaxToken) -> Option<SyntaxToken> {
    let mut prev = token.prev_token()?;
    while prev.text_range().is_empty() {
        prev = prev.prev_token()?;
    }
    Some(prev)
}

/// First following token that is not whitespace; `token` itself if there is none.
fn next_significant(token: SyntaxToken) -> SyntaxToken {
    let mut current = token.clone();
    while let Some(next) = current.next_token() {
        if !next.kind().is_whitespace() {
            return next;
        }
        current = next;
    }
    token
}
