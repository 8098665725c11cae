use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use log::{debug, error};

use crate::{
    core::{
        item::{ItemWriter, ItemWriterResult},
        type_spec::TypeSpec,
    },
    error::TypeSpecError,
};

pub struct DelimitedItemWriter<'a, T, W: Write> {
    spec: &'a TypeSpec<T>,
    stream: RefCell<BufWriter<W>>,
    has_headers: bool,
    header_written: Cell<bool>,
}

impl<T, W: Write> DelimitedItemWriter<'_, T, W> {
    fn write_line(stream: &mut BufWriter<W>, line: &str) -> ItemWriterResult {
        stream
            .write_all(line.as_bytes())
            .and_then(|()| stream.write_all(b"\n"))
            .map_err(|error| TypeSpecError::ItemWriter(error.to_string()))
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W, TypeSpecError> {
        self.stream
            .into_inner()
            .into_inner()
            .map_err(|error| TypeSpecError::ItemWriter(error.error().to_string()))
    }
}

impl<T, W: Write> ItemWriter<T> for DelimitedItemWriter<'_, T, W> {
    fn write(&self, items: &[T]) -> ItemWriterResult {
        let mut stream = self.stream.borrow_mut();

        if self.has_headers && !self.header_written.replace(true) {
            Self::write_line(&mut stream, &self.spec.header())?;
        }

        for item in items {
            if let Err(err) = Self::write_line(&mut stream, &self.spec.serialize(item)) {
                error!("Cannot write record: {}", err);
                return Err(err);
            }
        }

        debug!("{} record(s) written", items.len());
        Ok(())
    }

    /// Flush the contents of the internal buffer to the underlying writer.
    ///
    /// If there was a problem writing to the underlying writer, then an error
    /// is returned.
    fn flush(&self) -> ItemWriterResult {
        self.stream
            .borrow_mut()
            .flush()
            .map_err(|error| TypeSpecError::ItemWriter(error.to_string()))
    }
}

#[derive(Default)]
pub struct DelimitedItemWriterBuilder {
    has_headers: bool,
}

impl DelimitedItemWriterBuilder {
    pub fn new() -> DelimitedItemWriterBuilder {
        DelimitedItemWriterBuilder { has_headers: false }
    }

    /// Writes [`TypeSpec::header`] before the first record.
    pub fn has_headers(mut self, yes: bool) -> DelimitedItemWriterBuilder {
        self.has_headers = yes;
        self
    }

    /// Creates a writer to a file, truncating it if it exists.
    ///
    /// # Errors
    ///
    /// Returns `TypeSpecError::ItemWriter` if the file cannot be created.
    pub fn from_path<T, P: AsRef<Path>>(
        self,
        spec: &TypeSpec<T>,
        path: P,
    ) -> Result<DelimitedItemWriter<'_, T, File>, TypeSpecError> {
        let file = File::create(path.as_ref()).map_err(|error| {
            TypeSpecError::ItemWriter(format!("{}: {}", path.as_ref().display(), error))
        })?;
        Ok(self.from_writer(spec, file))
    }

    /// Serialize records with a `TypeSpec`, one line each.
    ///
    /// # Example
    ///
    /// ```
    /// # use std::error::Error;
    /// # use typespec_rs::core::field::{FieldTable, Record};
    /// # use typespec_rs::core::type_spec::TypeSpec;
    /// # use typespec_rs::core::item::ItemWriter;
    /// # use typespec_rs::item::delimited::delimited_writer::DelimitedItemWriterBuilder;
    /// struct Row {
    ///     city: String,
    ///     population: u32,
    /// }
    ///
    /// impl Record for Row {
    ///     fn describe(table: &mut FieldTable<Self>) {
    ///         table.field("city", |r: &Row| r.city.clone());
    ///         table.field("population", |r: &Row| r.population);
    ///         table.all_args_constructor(|args| {
    ///             Ok(Row { city: args.next()?, population: args.next()? })
    ///         });
    ///     }
    /// }
    ///
    /// # fn main() { example().unwrap(); }
    /// fn example() -> Result<(), Box<dyn Error>> {
    ///     let spec = TypeSpec::<Row>::for_type().build()?;
    ///     let wtr = DelimitedItemWriterBuilder::new()
    ///         .has_headers(true)
    ///         .from_writer(&spec, vec![]);
    ///
    ///     wtr.write(&[
    ///         Row { city: "Boston".to_string(), population: 4628910 },
    ///         Row { city: "Concord".to_string(), population: 42695 },
    ///     ])?;
    ///
    ///     let data = String::from_utf8(wtr.into_inner()?)?;
    ///     assert_eq!(data, "\
    /// city;population
    /// Boston;4628910
    /// Concord;42695
    /// ");
    ///     Ok(())
    /// }
    /// ```
    pub fn from_writer<T, W: Write>(
        self,
        spec: &TypeSpec<T>,
        wtr: W,
    ) -> DelimitedItemWriter<'_, T, W> {
        DelimitedItemWriter {
            spec,
            stream: RefCell::new(BufWriter::new(wtr)),
            has_headers: self.has_headers,
            header_written: Cell::new(false),
        }
    }
}
