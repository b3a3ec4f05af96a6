use super::DocumentWriter;
use aws_smithy_json::serialize::JsonValueWriter;
use aws_smithy_types::{Document, Number};
use std::io::Write;

pub struct Writer<'writer, W: Write> {
    writer: &'writer mut W,
    options: Options<'writer>,
}

impl<'writer, W: Write> Writer<'writer, W> {
    pub fn new(writer: &'writer mut W, options: Options<'writer>) -> Self {
        Self { writer, options }
    }

    fn write_value(&mut self, document: &Document, depth: usize) -> std::io::Result<()> {
        match document {
            Document::Object(map) => {
                if map.is_empty() {
                    return self.writer.write_all(b"{}");
                }

                let mut entries: Vec<_> = map.iter().collect();

                // `Document` objects are hash maps, so this is the only way
                // to get the same output for the same document twice
                if self.options.sort_keys {
                    entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
                }

                let colon: &[u8] = if self.options.indent.is_some() {
                    b": "
                } else {
                    b":"
                };

                self.writer.write_all(b"{")?;

                for (i, (key, value)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        self.writer.write_all(b",")?;
                    }
                    self.write_line_break(depth + 1)?;
                    write_string(self.writer, key)?;
                    self.writer.write_all(colon)?;
                    self.write_value(value, depth + 1)?;
                }

                self.write_line_break(depth)?;
                self.writer.write_all(b"}")
            }
            Document::Array(items) => {
                if items.is_empty() {
                    return self.writer.write_all(b"[]");
                }

                self.writer.write_all(b"[")?;

                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.writer.write_all(b",")?;
                    }
                    self.write_line_break(depth + 1)?;
                    self.write_value(item, depth + 1)?;
                }

                self.write_line_break(depth)?;
                self.writer.write_all(b"]")
            }
            Document::String(s) => write_string(self.writer, s),
            Document::Number(n) => write_number(self.writer, n),
            Document::Bool(true) => self.writer.write_all(b"true"),
            Document::Bool(false) => self.writer.write_all(b"false"),
            Document::Null => self.writer.write_all(b"null"),
        }
    }

    /// newline and indentation, pretty output only
    fn write_line_break(&mut self, depth: usize) -> std::io::Result<()> {
        if let Some(indent) = self.options.indent {
            self.writer.write_all(b"\n")?;

            for _ in 0..depth {
                self.writer.write_all(indent.as_bytes())?;
            }
        }

        Ok(())
    }
}

pub struct Options<'options> {
    /// one level of indentation; everything goes on one line when `None`
    indent: Option<&'options str>,
    sort_keys: bool,
}

impl<'options> Options<'options> {
    pub fn indent(mut self, indent: &'options str) -> Self {
        self.indent = Some(indent);
        self
    }

    pub fn sort_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }
}

impl Default for Options<'_> {
    fn default() -> Self {
        Self {
            indent: None,
            sort_keys: true,
        }
    }
}

impl<'writer, W: Write> DocumentWriter for Writer<'writer, W> {
    fn write_document(&mut self, document: &Document) -> std::io::Result<()> {
        self.write_value(document, 0)?;
        self.writer.write_all(b"\n")
    }
}

fn write_string<W: Write>(writer: &mut W, value: &str) -> std::io::Result<()> {
    let mut escaped = String::with_capacity(value.len() + 2);
    JsonValueWriter::new(&mut escaped).string(value);
    writer.write_all(escaped.as_bytes())
}

fn write_number<W: Write>(writer: &mut W, number: &Number) -> std::io::Result<()> {
    match number {
        Number::PosInt(i) => {
            let mut b = itoa::Buffer::new();
            writer.write_all(b.format(*i).as_bytes())
        }
        Number::NegInt(i) => {
            let mut b = itoa::Buffer::new();
            writer.write_all(b.format(*i).as_bytes())
        }
        Number::Float(f) if f.is_finite() => {
            let mut b = ryu::Buffer::new();
            writer.write_all(b.format_finite(*f).as_bytes())
        }
        // JSON has no NaN or infinity
        Number::Float(_) => writer.write_all(b"null"),
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentWriter, Options as JSONWriterOptions, Writer as JSONWriter};
    use crate::document::from_slice;
    use aws_smithy_types::{Document, Number};

    fn write(document: &Document, options: JSONWriterOptions) -> Vec<u8> {
        let mut buf = vec![];
        let mut writer = JSONWriter::new(&mut buf, options);
        writer.write_document(document).unwrap();
        buf
    }

    #[test]
    fn simple_object() {
        let document = from_slice(b"{\"c\":9, \"a\":1, \"b\":5}").unwrap();

        let buf = write(&document, JSONWriterOptions::default());

        let challenge = b"{\"a\":1,\"b\":5,\"c\":9}\n";

        assert_eq!(buf, challenge);
    }

    #[test]
    fn simple_array() {
        let document = from_slice(b"[1, -2, 3.5, null, true, false, \"ok\"]").unwrap();

        let buf = write(&document, JSONWriterOptions::default());

        let challenge = b"[1,-2,3.5,null,true,false,\"ok\"]\n";

        assert_eq!(buf, challenge);
    }

    #[test]
    fn nested_pretty() {
        let document = from_slice(br#"{"a": [{"b": [1, 2]}, null], "c": {}, "d": []}"#).unwrap();

        let buf = write(&document, JSONWriterOptions::default().indent("  "));

        let challenge = b"{
  \"a\": [
    {
      \"b\": [
        1,
        2
      ]
    },
    null
  ],
  \"c\": {},
  \"d\": []
}
";

        assert_eq!(
            std::str::from_utf8(&buf).unwrap(),
            std::str::from_utf8(challenge).unwrap()
        );
    }

    #[test]
    fn strings_are_escaped() {
        let document = Document::Object(
            [(
                "quote\"key".to_string(),
                Document::String("back\\slash\nnewline".to_string()),
            )]
            .into(),
        );

        let buf = write(&document, JSONWriterOptions::default());

        let challenge = br#"{"quote\"key":"back\\slash\nnewline"}"#;

        assert_eq!(buf[..buf.len() - 1], challenge[..]);
    }

    #[test]
    fn floats() {
        let document = Document::Array(vec![
            Document::Number(Number::Float(1.0)),
            Document::Number(Number::Float(0.25)),
            Document::Number(Number::Float(f64::NAN)),
            Document::Number(Number::Float(f64::INFINITY)),
        ]);

        let buf = write(&document, JSONWriterOptions::default());

        let challenge = b"[1.0,0.25,null,null]\n";

        assert_eq!(buf, challenge);
    }

    #[test]
    fn unsorted_keys() {
        let document = from_slice(br#"{"b": {"y": 2, "x": 1}, "a": [3]}"#).unwrap();

        let buf = write(&document, JSONWriterOptions::default().sort_keys(false));

        // hash map order, so only the shape of the output can be checked
        let written = std::str::from_utf8(&buf).unwrap();
        assert!(written.starts_with('{'));
        assert!(written.ends_with("}\n"));
        assert!(written.contains(r#""a":[3]"#));
        assert!(written.contains(r#""x":1"#));
        assert!(written.contains(r#""y":2"#));
        assert_eq!(from_slice(&buf).unwrap(), document);
    }

    #[test]
    fn written_output_reads_back() {
        let s = br#"{"users": [null, {"name": "x", "tags": [[1], []]}], "n": -7}"#;
        let document = from_slice(s).unwrap();

        let buf = write(&document, JSONWriterOptions::default().indent("\t"));

        assert_eq!(from_slice(&buf).unwrap(), document);
    }
}
