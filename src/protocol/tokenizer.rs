//! Whitespace tokenization of extracted frame text.

use super::{MAX_TOKENS, MAX_TOKEN_LEN};

/// Split frame text on runs of whitespace into at most [`MAX_TOKENS`] tokens
/// of at most [`MAX_TOKEN_LEN`] characters each. Never fails; a frame that
/// loses tokens to these bounds simply comes up short at dispatch.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .take(MAX_TOKENS)
        .map(|tok| tok.chars().take(MAX_TOKEN_LEN).collect())
        .collect()
}
