use aws_smithy_json::deserialize::error::DeserializeError;
use aws_smithy_types::Document;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The path produced no tokens, or one of its segments could not be
    /// decoded into a key and array indices.
    #[error("malformed path `{path}`: {reason}")]
    MalformedPath { path: String, reason: String },

    /// The walk needed to descend into a container of one kind
    /// but found a value of another kind.
    #[error("cannot resolve `{segment}`: expected {expected}, found {found}")]
    InvalidRoot {
        segment: String,
        expected: Kind,
        found: Kind,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] DeserializeError),

    #[error("invalid JSON string escape: {0}")]
    Unescape(String),

    #[error("unexpected end of JSON input")]
    UnexpectedEnd,

    #[error("unexpected data after the end of the JSON value")]
    TrailingData,
}

/// The shape of a tree node, as reported in errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

impl Kind {
    pub fn of(document: &Document) -> Self {
        match document {
            Document::Object(_) => Kind::Object,
            Document::Array(_) => Kind::Array,
            Document::String(_) => Kind::String,
            Document::Number(_) => Kind::Number,
            Document::Bool(_) => Kind::Bool,
            Document::Null => Kind::Null,
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Kind::Object => "an object",
            Kind::Array => "an array",
            Kind::String => "a string",
            Kind::Number => "a number",
            Kind::Bool => "a boolean",
            Kind::Null => "null",
        };

        f.write_str(name)
    }
}
