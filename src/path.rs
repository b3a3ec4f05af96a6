//! Dot/bracket paths and the auto-vivifying assignment that writes through them.
//!
//! A path like `users[2].profile.tags[0][1]` is tokenized once, when the
//! [`PathAccessor`] is built, into:
//!
//! ```text
//! IndexedKey("users", [2])
//! Key("profile")
//! IndexedKey("tags", [0, 1])
//! ```
//!
//! [`PathAccessor::apply`] then walks those tokens from a root
//! [`Document`], creating any object or array that is missing on the way,
//! and stores the value in the slot the last token addresses.

use crate::error::{Error, Kind, Result};
use aws_smithy_types::Document;
use log::{debug, trace, warn};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Largest array index a path may name. Reaching an index grows the array
/// to that length, so this also bounds what one `apply` can allocate.
pub const MAX_INDEX: usize = 1 << 20;

/// One navigation step of a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// An object member: `profile`.
    Key(String),
    /// An object member holding an array, followed by one or more indices
    /// into it (and into arrays nested inside it): `tags[0][1]`.
    IndexedKey(String, Vec<usize>),
    /// One or more indices into the current node itself: `[0]`.
    /// Only produced for segments that start with a bracket,
    /// such as the first segment of `[0].name`.
    Index(Vec<usize>),
}

impl Token {
    fn parts(&self) -> (Option<&str>, &[usize]) {
        match self {
            Token::Key(key) => (Some(key.as_str()), &[]),
            Token::IndexedKey(key, indices) => (Some(key.as_str()), indices.as_slice()),
            Token::Index(indices) => (None, indices.as_slice()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (key, indices) = self.parts();

        if let Some(key) = key {
            f.write_str(key)?;
        }

        for index in indices {
            write!(f, "[{index}]")?;
        }

        Ok(())
    }
}

/// Writes values into a [`Document`] at a fixed path, creating the objects
/// and arrays the path runs through when they don't exist yet.
///
/// The path is tokenized once, in [`PathAccessor::new`], and the accessor can
/// then be applied any number of times, to any number of roots.
///
/// ```
/// use aws_smithy_types::Document;
/// use jset::PathAccessor;
/// use std::collections::HashMap;
///
/// let accessor = PathAccessor::new("a.b[1]");
/// let mut root = Document::Object(HashMap::new());
///
/// accessor.apply(&mut root, Document::Bool(true)).unwrap();
///
/// let b = Document::Array(vec![Document::Null, Document::Bool(true)]);
/// let a = Document::Object(HashMap::from([("b".to_string(), b)]));
/// assert_eq!(root, Document::Object(HashMap::from([("a".to_string(), a)])));
/// ```
#[derive(Clone, Debug)]
pub struct PathAccessor {
    path: String,
    tokens: Vec<Token>,
    /// why `path` could not be tokenized,
    /// reported by `apply` rather than by `new`
    malformed: Option<String>,
}

impl PathAccessor {
    /// Tokenize `path`.
    ///
    /// This never fails. A malformed path is remembered and reported by every
    /// call to [`PathAccessor::apply`]; use [`str::parse`] to reject it up front.
    pub fn new(path: &str) -> Self {
        let (tokens, malformed) = match tokenize(path) {
            Ok(tokens) if tokens.is_empty() => (tokens, Some("path has no segments".to_string())),
            Ok(tokens) => (tokens, None),
            Err(reason) => (vec![], Some(reason)),
        };

        Self {
            path: path.to_string(),
            tokens,
            malformed,
        }
    }

    /// The path exactly as it was given.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The tokens of the path, in traversal order.
    /// Empty if the path is malformed.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Store `value` at this path, starting from `root`.
    ///
    /// Existing containers along the path are reused. Missing (or `null`)
    /// slots are filled with a fresh object or array, whichever the next step
    /// needs, and so are slots holding a scalar. Arrays grow as needed, with
    /// `null` in any gap. Whatever the last step addresses is overwritten.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedPath`] if the path is empty or could not be tokenized.
    ///   The root is left untouched.
    /// - [`Error::InvalidRoot`] if a key has to be looked up in something other
    ///   than an object, or an index in something other than an array.
    ///   Such a mismatch can only be met in the part of `root` that existed
    ///   before the call, so nothing has been created or replaced yet.
    pub fn apply(&self, root: &mut Document, value: Document) -> Result<()> {
        if let Some(reason) = &self.malformed {
            return Err(self.malformed_path(reason));
        }

        let Some((last, _)) = self.tokens.split_last() else {
            return Err(self.malformed_path("path has no segments"));
        };

        let mut node = root;

        for (token, next) in self.tokens.iter().zip(&self.tokens[1..]) {
            trace!("resolving `{token}` of `{}`", self.path);
            node = vivify(slot(node, token)?, Container::needed_by(next), token);
        }

        trace!("assigning `{last}` of `{}`", self.path);
        *slot(node, last)? = value;

        Ok(())
    }

    fn malformed_path(&self, reason: &str) -> Error {
        Error::MalformedPath {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl FromStr for PathAccessor {
    type Err = Error;

    /// Like [`PathAccessor::new`], but fails right away on a malformed path.
    fn from_str(path: &str) -> Result<Self> {
        let accessor = Self::new(path);

        match &accessor.malformed {
            Some(reason) => Err(accessor.malformed_path(reason)),
            None => Ok(accessor),
        }
    }
}

/// Renders the normalized path, `users[2].tags[0][1]`,
/// or the original text if the path is malformed.
impl fmt::Display for PathAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.malformed.is_some() {
            return f.write_str(&self.path);
        }

        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{token}")?;
        }

        Ok(())
    }
}

/// Strip whitespace, split on `.`, drop empty segments,
/// then decode each segment into a token.
fn tokenize(path: &str) -> Result<Vec<Token>, String> {
    let stripped: String = path.chars().filter(|c| !c.is_whitespace()).collect();

    stripped
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(tokenize_segment)
        .collect()
}

/// `name`, `name[0][1]` or `[0][1]`
fn tokenize_segment(segment: &str) -> Result<Token, String> {
    let Some(bracket) = segment.find(&['[', ']'][..]) else {
        return Ok(Token::Key(segment.to_string()));
    };

    let (key, mut rest) = segment.split_at(bracket);
    let mut indices = vec![];

    while !rest.is_empty() {
        let Some(inside) = rest.strip_prefix('[') else {
            return Err(format!("unexpected `{rest}` in `{segment}`"));
        };

        let Some(close) = inside.find(']') else {
            return Err(format!("unclosed `[` in `{segment}`"));
        };

        let index = &inside[..close];

        let index = parse_index(index)
            .ok_or_else(|| format!("`{index}` in `{segment}` is not an array index"))?;

        if index > MAX_INDEX {
            return Err(format!(
                "index {index} in `{segment}` is larger than {MAX_INDEX}"
            ));
        }

        indices.push(index);

        rest = &inside[close + 1..];
    }

    if key.is_empty() {
        Ok(Token::Index(indices))
    } else {
        Ok(Token::IndexedKey(key.to_string(), indices))
    }
}

/// non-negative base 10 integers only, so no signs
fn parse_index(index: &str) -> Option<usize> {
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    index.parse().ok()
}

#[derive(Clone, Copy, Debug)]
enum Container {
    Object,
    Array,
}

impl Container {
    /// Every token but [`Token::Index`] starts with a key lookup,
    /// which needs an object.
    fn needed_by(next: &Token) -> Self {
        match next {
            Token::Key(_) | Token::IndexedKey(..) => Container::Object,
            Token::Index(_) => Container::Array,
        }
    }

    fn empty(self) -> Document {
        match self {
            Container::Object => Document::Object(HashMap::new()),
            Container::Array => Document::Array(vec![]),
        }
    }

    fn kind(self) -> Kind {
        match self {
            Container::Object => Kind::Object,
            Container::Array => Kind::Array,
        }
    }
}

/// Make sure `slot` holds a container so the walk can continue into it.
///
/// An existing object or array is kept as it is, even if it is not the kind
/// asked for; the next step reports the mismatch.
fn vivify<'a>(slot: &'a mut Document, container: Container, token: &Token) -> &'a mut Document {
    match Kind::of(slot) {
        Kind::Object | Kind::Array => return slot,
        Kind::Null => debug!("creating {} at `{token}`", container.kind()),
        scalar => warn!(
            "replacing {scalar} at `{token}` with {}",
            container.kind()
        ),
    }

    *slot = container.empty();
    slot
}

/// Walk the key and indices of `token` from `node`, vivifying arrays for
/// every step but the last, and return the slot the last step addresses.
fn slot<'a>(node: &'a mut Document, token: &Token) -> Result<&'a mut Document> {
    let (key, indices) = token.parts();

    let mut node = match key {
        Some(key) => {
            let child = member(node, key, token)?;

            if indices.is_empty() {
                return Ok(child);
            }

            vivify(child, Container::Array, token)
        }
        None => node,
    };

    let Some((&last, leading)) = indices.split_last() else {
        unreachable!("a token without a key always has an index")
    };

    for &index in leading {
        node = vivify(element(node, index, token)?, Container::Array, token);
    }

    element(node, last, token)
}

/// the member `key` of an object, inserted as `null` if it is missing
fn member<'a>(node: &'a mut Document, key: &str, token: &Token) -> Result<&'a mut Document> {
    match node {
        Document::Object(map) => Ok(map.entry(key.to_string()).or_insert(Document::Null)),
        other => Err(Error::InvalidRoot {
            segment: token.to_string(),
            expected: Kind::Object,
            found: Kind::of(other),
        }),
    }
}

/// the element `index` of an array, growing it with `null`s if it is too short
fn element<'a>(node: &'a mut Document, index: usize, token: &Token) -> Result<&'a mut Document> {
    match node {
        Document::Array(items) => {
            if index >= items.len() {
                let len = index.checked_add(1).ok_or_else(|| Error::MalformedPath {
                    path: token.to_string(),
                    reason: format!("index {index} is too large"),
                })?;
                items.resize(len, Document::Null);
            }

            Ok(&mut items[index])
        }
        other => Err(Error::InvalidRoot {
            segment: token.to_string(),
            expected: Kind::Array,
            found: Kind::of(other),
        }),
    }
}
