use aws_smithy_types::Document;

pub mod json;

pub trait DocumentWriter {
    fn write_document(&mut self, document: &Document) -> std::io::Result<()>;
}
