use clap::Parser;
use jset::document_writer::json::{Options as JSONWriterOptions, Writer as JSONWriter};
use jset::document_writer::DocumentWriter;
use jset::{Document, PathAccessor};
use std::collections::HashMap;
use std::error::Error;
use std::io::{BufWriter, Read, Write};
use std::mem::ManuallyDrop;
use std::path::PathBuf;

/// Set values in a JSON document at paths like `users[2].tags[0]`.
#[derive(Parser, Debug)]
#[clap(author, version, about, name = "jset")]
struct Options {
    /// A JSON file path, stdin if absent
    #[arg()]
    json_location: Option<PathBuf>,

    /// `PATH=VALUE`, where VALUE is JSON. Applied in order
    #[arg(short = 's', long = "set", value_name = "PATH=VALUE", required = true)]
    assignments: Vec<String>,

    /// Take every VALUE as a string rather than JSON
    #[arg(short, long)]
    raw: bool,

    /// Start from `{}` instead of reading a document
    #[arg(short, long, conflicts_with = "json_location")]
    null_input: bool,

    /// Indent the output with two spaces
    #[arg(short, long)]
    pretty: bool,
}

fn parse_assignment(
    assignment: &str,
    raw: bool,
) -> Result<(PathAccessor, Document), Box<dyn Error>> {
    let (path, value) = assignment
        .split_once('=')
        .ok_or_else(|| format!("`{assignment}` is not of the form PATH=VALUE"))?;

    let accessor: PathAccessor = path.parse()?;

    let value = if raw {
        Document::String(value.to_string())
    } else {
        jset::document::from_slice(value.as_bytes())?
    };

    Ok((accessor, value))
}

/// Buffered, and flushed before returning so the last write's error is not lost.
fn write_output<W: Write>(out: W, root: &Document, pretty: bool) -> std::io::Result<()> {
    let mut out = BufWriter::new(out);

    let writer_options = if pretty {
        JSONWriterOptions::default().indent("  ")
    } else {
        JSONWriterOptions::default()
    };

    let mut json_writer = JSONWriter::new(&mut out, writer_options);

    json_writer.write_document(root)?;

    out.flush()
}

fn main() -> Result<(), Box<dyn Error>> {
    // https://github.com/rust-lang/rust/issues/46016
    #[cfg(target_family = "unix")]
    {
        use nix::sys::signal;
        let _ = unsafe { signal::signal(signal::Signal::SIGPIPE, signal::SigHandler::SigDfl)? };
    }

    let options = Options::parse();

    // check every assignment before reading any input
    let assignments = options
        .assignments
        .iter()
        .map(|assignment| parse_assignment(assignment, options.raw))
        .collect::<Result<Vec<_>, _>>()?;

    let mut root = if options.null_input {
        Document::Object(HashMap::new())
    } else {
        let buf = if let Some(json_location) = &options.json_location {
            std::fs::read(json_location)?
        } else {
            let mut buf = vec![];
            let stdin = std::io::stdin();
            let mut stdin = stdin.lock();
            stdin.read_to_end(&mut buf)?;
            buf
        };

        let buf = ManuallyDrop::new(buf);

        jset::document::from_slice(&buf)?
    };

    for (accessor, value) in assignments {
        accessor.apply(&mut root, value)?;
    }

    write_output(std::io::stdout().lock(), &root, options.pretty)?;

    Ok(())
}
