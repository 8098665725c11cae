use crate::error::TypeSpecError;

/// Represents the result of reading an item from the reader.
///
/// `Ok(None)` means the reader is exhausted.
pub type ItemReaderResult<R> = Result<Option<R>, TypeSpecError>;

/// Represents the result of writing items with the writer.
pub type ItemWriterResult = Result<(), TypeSpecError>;

/// A source of records, read one at a time.
pub trait ItemReader<R> {
    fn read(&self) -> ItemReaderResult<R>;
}

/// A sink of records, written one chunk at a time.
pub trait ItemWriter<W> {
    fn write(&self, items: &[W]) -> ItemWriterResult;

    /// Flushes buffered output to the underlying destination.
    fn flush(&self) -> ItemWriterResult {
        Ok(())
    }
}
