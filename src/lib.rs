#![forbid(unsafe_code)]

//! Write values into JSON-shaped trees at dot/bracket paths like
//! `users[2].profile.tags[0][1]`, creating the objects and arrays
//! along the way.
//!
//! Trees are [`aws_smithy_types::Document`]s. [`document::from_slice`] reads
//! one from JSON text and [`document_writer::json::Writer`] writes one back.

pub use aws_smithy_types::Document;
pub use error::{Error, Kind, Result};
pub use path::{PathAccessor, Token, MAX_INDEX};

pub mod document;
pub mod document_writer;
mod error;
mod path;
