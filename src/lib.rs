#![cfg_attr(docsrs, feature(doc_cfg))]
//#![warn(missing_docs)]

/*!
 <div align="center">
   <h1>TypeSpec for Rust</h1>
   <h3>Typed records to delimited lines, and back</h3>
  </div>

 # TypeSpec for Rust

 **TypeSpec** maps a record type to a single delimited text line and parses that
 line back into a record. The field table of a type is described once, the
 mapping is configured through a fluent builder, and the resulting codec is
 frozen: it can be shared across threads and reused for any number of records.

 ## Core Concepts

- **Record:** A type that describes its fields once, in a `FieldTable`. Value types register
  read-only fields and an all-args constructor; mutable types register getter/setter pairs and
  a no-args constructor.
- **ValueKind:** The conversion category of a field (string, integer, decimal, boolean, date,
  date-time, or a custom kind). Each kind has a `Converter` pair rendering and parsing text.
- **TypeSpecBuilder:** Collects the mapping configuration: null replacement, delimiter, field
  positions, field-level and kind-level render overrides, custom converters.
- **TypeSpec:** The frozen codec. `serialize` renders one line, `deserialize` parses one line.

 ## Precedence Rules

- **Position:** a position given on the builder wins over a position declared in the field
  table, which wins over the declaration order. `LAST_POSITION` moves a field to the end.
  At equal positions, fields keep their declaration order.
- **Rendering:** a field mapping wins over a type mapping, which wins over the converter of
  the field kind. Absent values are always written as the null replacement.
- **Parsing:** always done by the converter of the field kind. The null replacement parses
  back to an absent value.

 ## Features

| **Feature**   | **Description**                                                        |
|---------------|------------------------------------------------------------------------|
| delimited     | Enables a delimited line `ItemReader` and `ItemWriter` based on `TypeSpec` |
| full          | Enables all available features                                          |

 ## Getting Started

```rust
# use chrono::NaiveDate;
# use rust_decimal::Decimal;
use typespec_rs::{
    core::{
        field::{FieldTable, LAST_POSITION, Record},
        type_spec::TypeSpec,
    },
    error::TypeSpecError,
};

#[derive(Debug, Clone, PartialEq)]
struct Customer {
    id: i32,
    name: Option<String>,
    points: Option<Decimal>,
    joined: Option<NaiveDate>,
    flagged: bool,
}

impl Record for Customer {
    fn describe(table: &mut FieldTable<Self>) {
        table.field("id", |c: &Customer| c.id);
        table.field("name", |c: &Customer| c.name.clone());
        table.field("points", |c: &Customer| c.points);
        table.field("joined", |c: &Customer| c.joined);
        table.field("flagged", |c: &Customer| c.flagged);
        table.all_args_constructor(|args| {
            Ok(Customer {
                id: args.next()?,
                name: args.next()?,
                points: args.next()?,
                joined: args.next()?,
                flagged: args.next()?,
            })
        });
    }
}

fn main() -> Result<(), TypeSpecError> {
    let spec = TypeSpec::<Customer>::for_type()
        .null_replacement("NULL")
        .position("joined", 0)
        .position("id", LAST_POSITION)
        .serialization(|s| s.field_mapping("name", |c: &Customer| {
            c.name.clone().unwrap_or_default().to_uppercase()
        }))
        .build()?;

    let customer = Customer {
        id: 1,
        name: None,
        points: Some(Decimal::new(1593, 2)),
        joined: NaiveDate::from_ymd_opt(2010, 4, 17),
        flagged: false,
    };

    let line = spec.serialize(&customer);
    assert_eq!(line, "2010-04-17;NULL;15.93;false;1");
    assert_eq!(spec.deserialize(&line)?, customer);

    Ok(())
}
```

 ## Limitations

Field values are written as they are: a value containing the delimiter produces a line that
cannot be parsed back. Nothing detects or escapes it.

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.

 ## Contribution
 Unless you explicitly state otherwise, any contribution intentionally submitted
 for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
 dual licensed as above, without any additional terms or conditions

 */

/// Core module: value model, converters, field tables and the `TypeSpec` codec
pub mod core;

/// Error types for mapping operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Set of items readers / writers built on `TypeSpec`
pub mod item;
