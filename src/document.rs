//! Reads JSON text into an [`aws_smithy_types::Document`] tree.

use crate::error::{Error, Result};
use aws_smithy_json::deserialize::{json_token_iter, EscapedStr, Token};
use aws_smithy_types::Document;
use std::collections::HashMap;

/// a container that has been opened but not yet closed
enum Frame {
    Object {
        map: HashMap<String, Document>,
        /// the most recent key, waiting for its value
        key: Option<String>,
    },
    Array(Vec<Document>),
}

#[derive(Default)]
struct State {
    /// open containers, from least deep to most deep
    stack: Vec<Frame>,
    /// set once the top-level value is complete
    root: Option<Document>,
}

impl State {
    fn open_object(&mut self) {
        self.stack.push(Frame::Object {
            map: HashMap::new(),
            key: None,
        });
    }

    fn open_array(&mut self) {
        self.stack.push(Frame::Array(vec![]));
    }

    fn set_key(&mut self, new_key: String) {
        if let Some(Frame::Object { key, .. }) = self.stack.last_mut() {
            *key = Some(new_key)
        } else {
            unreachable!("the tokenizer only yields keys inside objects")
        }
    }

    /// attach a finished value to the innermost open container,
    /// or make it the root if nothing is open
    fn push_value(&mut self, value: Document) {
        match self.stack.last_mut() {
            Some(Frame::Object { map, key }) => match key.take() {
                Some(key) => {
                    map.insert(key, value);
                }
                None => unreachable!("the tokenizer yields a key before every object value"),
            },
            Some(Frame::Array(items)) => items.push(value),
            None => self.root = Some(value),
        }
    }

    fn close_container(&mut self) {
        let document = match self.stack.pop() {
            Some(Frame::Object { map, .. }) => Document::Object(map),
            Some(Frame::Array(items)) => Document::Array(items),
            None => unreachable!("the tokenizer balances start and end tokens"),
        };

        self.push_value(document)
    }
}

/// Parse exactly one JSON value from `input`.
///
/// Surrounding whitespace is allowed; anything else after the value is an error.
pub fn from_slice(input: &[u8]) -> Result<Document> {
    let mut state = State::default();

    for token in json_token_iter(input) {
        let token = token?;

        if state.root.is_some() {
            return Err(Error::TrailingData);
        }

        match token {
            Token::ValueString { value, .. } => {
                state.push_value(Document::String(unescape(value)?));
            }
            Token::ValueNumber { value, .. } => {
                state.push_value(Document::Number(value));
            }
            Token::ValueBool { value, .. } => {
                state.push_value(Document::Bool(value));
            }
            Token::ValueNull { .. } => {
                state.push_value(Document::Null);
            }
            Token::ObjectKey { key, .. } => {
                state.set_key(unescape(key)?);
            }
            Token::StartObject { .. } => state.open_object(),
            Token::StartArray { .. } => state.open_array(),
            Token::EndObject { .. } | Token::EndArray { .. } => state.close_container(),
        }
    }

    state.root.ok_or(Error::UnexpectedEnd)
}

fn unescape(value: EscapedStr<'_>) -> Result<String> {
    value
        .to_unescaped()
        .map(|unescaped| unescaped.into_owned())
        .map_err(|e| Error::Unescape(e.to_string()))
}
