use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::{BufRead, BufReader, Lines, Read},
    path::Path,
};

use log::{debug, error, warn};

use crate::{
    core::{
        item::{ItemReader, ItemReaderResult},
        type_spec::TypeSpec,
    },
    error::TypeSpecError,
};

/// A delimited item reader that implements the `ItemReader` trait.
///
/// Each line of the source is one record, parsed with the `TypeSpec` the
/// reader was built with.
///
/// # Implementation Details
///
/// - Uses a `RefCell` to provide interior mutability for the line iterator
/// - Reports I/O and format errors as `TypeSpecError::ItemReader`, with the
///   1-based line number
/// - Streams the source without loading it into memory
///
/// # Examples
///
/// ```
/// use typespec_rs::core::field::{FieldTable, Record};
/// use typespec_rs::core::item::ItemReader;
/// use typespec_rs::core::type_spec::TypeSpec;
/// use typespec_rs::item::delimited::delimited_reader::DelimitedItemReaderBuilder;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct City {
///     name: String,
///     pop: u32,
/// }
///
/// impl Record for City {
///     fn describe(table: &mut FieldTable<Self>) {
///         table.property("name", |c: &City| c.name.clone(), |c, v| c.name = v);
///         table.property("pop", |c: &City| c.pop, |c, v| c.pop = v);
///         table.no_args_constructor(City::default);
///     }
/// }
///
/// let spec = TypeSpec::<City>::for_type().build().unwrap();
/// let data = "name;pop\nBoston;4628910\nConcord;42695\n";
///
/// let reader = DelimitedItemReaderBuilder::new(&spec)
///     .has_headers(true)
///     .from_reader(data.as_bytes());
///
/// let boston = reader.read().unwrap().unwrap();
/// assert_eq!(boston, City { name: "Boston".to_string(), pop: 4628910 });
/// assert_eq!(reader.read().unwrap().unwrap().name, "Concord");
/// assert!(reader.read().unwrap().is_none());
/// ```
pub struct DelimitedItemReader<'a, T, R> {
    spec: &'a TypeSpec<T>,
    lines: RefCell<Lines<R>>,
    skip_header: Cell<bool>,
    line_number: Cell<usize>,
}

impl<T, R: BufRead> DelimitedItemReader<'_, T, R> {
    fn next_line(&self) -> Option<Result<String, TypeSpecError>> {
        let line = self.lines.borrow_mut().next()?;
        self.line_number.set(self.line_number.get() + 1);
        Some(line.map_err(|error| {
            TypeSpecError::ItemReader(format!("line {}: {}", self.line_number.get(), error))
        }))
    }

    fn consume_header(&self) -> Result<(), TypeSpecError> {
        if let Some(header) = self.next_line() {
            let header = header?;
            let expected = self.spec.header();
            if header != expected {
                warn!("Header `{}` differs from expected `{}`", header, expected);
            }
        }
        Ok(())
    }
}

impl<T, R: BufRead> ItemReader<T> for DelimitedItemReader<'_, T, R> {
    /// Reads the next record.
    ///
    /// # Returns
    /// - `Ok(Some(record))` if a line is successfully parsed
    /// - `Ok(None)` if there are no more lines
    /// - `Err(TypeSpecError::ItemReader(error))` if the line cannot be read or parsed
    fn read(&self) -> ItemReaderResult<T> {
        if self.skip_header.replace(false) {
            self.consume_header()?;
        }

        match self.next_line() {
            None => {
                debug!("End of delimited input after {} line(s)", self.line_number.get());
                Ok(None)
            }
            Some(line) => {
                let line = line?;
                match self.spec.deserialize(&line) {
                    Ok(item) => Ok(Some(item)),
                    Err(err) => {
                        error!("Cannot read line {}: {}", self.line_number.get(), err);
                        Err(TypeSpecError::ItemReader(format!(
                            "line {}: {}",
                            self.line_number.get(),
                            err
                        )))
                    }
                }
            }
        }
    }
}

/// A builder for configuring delimited item reading.
///
/// # Default Configuration
///
/// - Headers: disabled
///
/// The delimiter and null replacement come from the `TypeSpec`.
pub struct DelimitedItemReaderBuilder<'a, T> {
    spec: &'a TypeSpec<T>,
    has_headers: bool,
}

impl<'a, T> DelimitedItemReaderBuilder<'a, T> {
    pub fn new(spec: &'a TypeSpec<T>) -> Self {
        Self {
            spec,
            has_headers: false,
        }
    }

    /// Sets whether the first line is a header to skip.
    ///
    /// A header that does not match [`TypeSpec::header`] is logged, not rejected.
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    /// Creates a reader over any `Read` source.
    pub fn from_reader<R: Read>(self, rdr: R) -> DelimitedItemReader<'a, T, BufReader<R>> {
        self.from_buf_reader(BufReader::new(rdr))
    }

    /// Creates a reader over an already buffered source.
    pub fn from_buf_reader<R: BufRead>(self, rdr: R) -> DelimitedItemReader<'a, T, R> {
        DelimitedItemReader {
            spec: self.spec,
            lines: RefCell::new(rdr.lines()),
            skip_header: Cell::new(self.has_headers),
            line_number: Cell::new(0),
        }
    }

    /// Creates a reader over a file.
    ///
    /// # Errors
    ///
    /// Returns `TypeSpecError::ItemReader` if the file cannot be opened.
    pub fn from_path<P: AsRef<Path>>(
        self,
        path: P,
    ) -> Result<DelimitedItemReader<'a, T, BufReader<File>>, TypeSpecError> {
        let file = File::open(path.as_ref()).map_err(|error| {
            TypeSpecError::ItemReader(format!("{}: {}", path.as_ref().display(), error))
        })?;
        Ok(self.from_reader(file))
    }
}
