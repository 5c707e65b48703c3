//! Compact range notation for orbital indices.
//!
//! DIRAC's MOLTRA section and the RAS keywords of DIRAC-CASPT2 describe sets of
//! orbitals with a space-separated list of tokens, where each token is either a
//! single index (`7`) or an inclusive run of consecutive indices (`1..5`).
//!
//! ```
//! use dcaspt2_input::range::{compress, expand};
//!
//! assert_eq!(compress(&[1, 2, 4, 5, 7]), "1..2 4..5 7");
//! assert_eq!(expand("1..2 4..5 7").unwrap(), vec![1, 2, 4, 5, 7]);
//! ```

use thiserror::Error;

/// Errors produced while expanding range notation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RangeError {
    /// Token is neither an integer nor an `a..b` range
    #[error("Invalid range token: '{0}'")]
    InvalidToken(String),
    /// Orbital indices start at 1
    #[error("Orbital index must be positive in token '{0}'")]
    ZeroIndex(String),
    /// Range end lies before its start
    #[error("Reversed range: '{0}'")]
    Reversed(String),
}

/// Compresses a strictly ascending sequence of indices into range notation.
///
/// Maximal runs of consecutive integers become `a..b`, isolated indices are
/// written alone. An empty slice yields an empty string.
pub fn compress(sorted_indices: &[u32]) -> String {
    debug_assert!(
        sorted_indices.windows(2).all(|w| w[0] < w[1]),
        "indices must be strictly ascending"
    );

    let mut iter = sorted_indices.iter().copied();
    let Some(first) = iter.next() else {
        return String::new();
    };

    let mut tokens = Vec::new();
    let mut run_start = first;
    let mut prev = first;
    for index in iter {
        if prev.checked_add(1) != Some(index) {
            tokens.push(run_token(run_start, prev));
            run_start = index;
        }
        prev = index;
    }
    tokens.push(run_token(run_start, prev));

    tokens.join(" ")
}

fn run_token(start: u32, end: u32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{}..{}", start, end)
    }
}

/// Parses range notation into inclusive `(start, end)` runs without
/// materializing the indices.
///
/// A single index `7` becomes `(7, 7)`.
pub fn runs(notation: &str) -> Result<Vec<(u32, u32)>, RangeError> {
    notation
        .split_whitespace()
        .map(|token| match token.split_once("..") {
            Some((start, end)) => {
                let start = parse_index(start, token)?;
                let end = parse_index(end, token)?;
                if end < start {
                    return Err(RangeError::Reversed(token.to_string()));
                }
                Ok((start, end))
            }
            None => {
                let index = parse_index(token, token)?;
                Ok((index, index))
            }
        })
        .collect()
}

/// Expands range notation back into the list of indices it denotes.
///
/// Tokens are expanded in the order they appear; duplicates are not removed.
/// Callers holding untrusted notation should work with [`runs`] instead.
pub fn expand(notation: &str) -> Result<Vec<u32>, RangeError> {
    let mut indices = Vec::new();
    for (start, end) in runs(notation)? {
        indices.extend(start..=end);
    }
    Ok(indices)
}

fn parse_index(text: &str, token: &str) -> Result<u32, RangeError> {
    let value: u32 = text
        .parse()
        .map_err(|_| RangeError::InvalidToken(token.to_string()))?;
    if value == 0 {
        return Err(RangeError::ZeroIndex(token.to_string()));
    }
    Ok(value)
}
