//! Delimited line support for reading and writing records.
//!
//! This module plugs a [`TypeSpec`](crate::core::type_spec::TypeSpec) into the
//! item reader and writer abstractions: every line of the input or output is
//! one record, rendered and parsed by the codec.
//!
//! # Module Architecture
//!
//! 1. **DelimitedItemReader**: reads records from any `Read`/`BufRead`
//!    source or a file, optionally skipping a header line.
//!
//! 2. **DelimitedItemWriter**: writes records to any `Write` destination or
//!    a file, optionally starting with a header line.
//!
//! Both components follow the builder pattern and borrow the `TypeSpec`
//! for their whole lifetime, so one codec can serve many readers and writers.
//!
//! # Ownership and Borrowing Considerations
//!
//! Writers own their destination. To get a `Vec<u8>` back after writing,
//! call `into_inner`, which also flushes the internal buffer.
//!
//! # Examples
//!
//! ```
//! use typespec_rs::core::field::{FieldTable, Record};
//! use typespec_rs::core::item::{ItemReader, ItemWriter};
//! use typespec_rs::core::type_spec::TypeSpec;
//! use typespec_rs::item::delimited::delimited_reader::DelimitedItemReaderBuilder;
//! use typespec_rs::item::delimited::delimited_writer::DelimitedItemWriterBuilder;
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: Option<u8>,
//! }
//!
//! impl Record for Person {
//!     fn describe(table: &mut FieldTable<Self>) {
//!         table.property("name", |p: &Person| p.name.clone(), |p, v| p.name = v);
//!         table.property("age", |p: &Person| p.age, |p, v| p.age = v);
//!         table.no_args_constructor(Person::default);
//!     }
//! }
//!
//! let spec = TypeSpec::<Person>::for_type()
//!     .null_replacement("?")
//!     .build()
//!     .unwrap();
//!
//! let people = vec![
//!     Person { name: "Alice".to_string(), age: Some(28) },
//!     Person { name: "Bob".to_string(), age: None },
//! ];
//!
//! let writer = DelimitedItemWriterBuilder::new()
//!     .has_headers(true)
//!     .from_writer(&spec, Vec::new());
//! writer.write(&people).unwrap();
//! let output = writer.into_inner().unwrap();
//! assert_eq!(String::from_utf8(output.clone()).unwrap(), "name;age\nAlice;28\nBob;?\n");
//!
//! let reader = DelimitedItemReaderBuilder::new(&spec)
//!     .has_headers(true)
//!     .from_reader(output.as_slice());
//!
//! let mut read_back = Vec::new();
//! while let Some(person) = reader.read().unwrap() {
//!     read_back.push(person);
//! }
//! assert_eq!(read_back, people);
//! ```

/// A module providing facilities for reading delimited records.
pub mod delimited_reader;

/// A module providing facilities for writing delimited records.
pub mod delimited_writer;
