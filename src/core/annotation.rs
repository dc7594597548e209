//! Parsing of semicolon-delimited FASTA annotations.
//!
//! An annotation is the record label split on `;`. Each token is either a
//! *monad* (no `=`, e.g. `NM_000518`) or a *pair* (`key=value`). Tokens with
//! more than one `=` are neither and are skipped.
//!
//! ```text
//! >NM_000518;HBB;size=628;organism=9606
//! ```
//!
//! The first monad names the sequence (`NM_000518`) and the last `size` pair
//! gives its abundance (`628`).

/// Name used when an annotation carries no monad
pub const DEFAULT_NAME: &str = "sequence";

/// Abundance used when an annotation carries no usable `size` pair
pub const DEFAULT_SIZE: u64 = 1;

/// Key of the pair carrying the abundance
pub const SIZE_KEY: &str = "size";

/// The name and abundance carried by a record label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub name: String,
    pub size: u64,
}

/// A single `;`-separated token of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Monad(&'a str),
    Pair(&'a str, &'a str),
    Ignored,
}

impl<'a> Token<'a> {
    fn classify(item: &'a str) -> Self {
        let mut fields = item.split('=');
        match (fields.next(), fields.next(), fields.next()) {
            (Some(monad), None, _) => Token::Monad(monad),
            (Some(key), Some(value), None) => Token::Pair(key, value),
            _ => Token::Ignored,
        }
    }
}

impl Annotation {
    /// Parse a record label.
    ///
    /// Never fails: a label without a monad is named [`DEFAULT_NAME`], and a
    /// label whose last `size` pair is missing, non-numeric, or not positive
    /// gets [`DEFAULT_SIZE`]. Empty tokens count as monads, so `";size=3"` is
    /// named `""`.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        let mut name: Option<&str> = None;
        let mut size_value: Option<&str> = None;

        for item in label.split(';') {
            match Token::classify(item) {
                Token::Monad(monad) => {
                    name.get_or_insert(monad);
                }
                Token::Pair(key, value) if key == SIZE_KEY => size_value = Some(value),
                Token::Pair(..) | Token::Ignored => {}
            }
        }

        Self {
            name: name.unwrap_or(DEFAULT_NAME).to_string(),
            size: size_value.map_or(DEFAULT_SIZE, parse_size),
        }
    }
}

/// Parse a `size` value, falling back to [`DEFAULT_SIZE`] for anything that
/// isn't a positive base-10 integer
#[allow(clippy::cast_sign_loss)] // Checked positive
fn parse_size(value: &str) -> u64 {
    match value.parse::<i64>() {
        Ok(size) if size > 0 => size as u64,
        _ => DEFAULT_SIZE,
    }
}
