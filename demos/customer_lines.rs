use std::{env::temp_dir, fmt, fs};

use chrono::NaiveDate;
use log::info;
use rust_decimal::Decimal;

use typespec_rs::{
    core::{
        field::{FieldTable, LAST_POSITION, Record},
        item::{ItemReader, ItemWriter},
        settings::SpecSettings,
        type_spec::TypeSpec,
    },
    item::delimited::{
        delimited_reader::DelimitedItemReaderBuilder,
        delimited_writer::DelimitedItemWriterBuilder,
    },
};

#[derive(Debug, Clone, Default, PartialEq)]
struct Customer {
    id: i32,
    name: Option<String>,
    points: Option<Decimal>,
    joined: Option<NaiveDate>,
    flagged: bool,
}

impl Record for Customer {
    fn describe(table: &mut FieldTable<Self>) {
        table.property("id", |c: &Customer| c.id, |c, v| c.id = v);
        table.property("name", |c: &Customer| c.name.clone(), |c, v| c.name = v);
        table.property("points", |c: &Customer| c.points, |c, v| c.points = v);
        table.property("joined", |c: &Customer| c.joined, |c, v| c.joined = v);
        table.property("flagged", |c: &Customer| c.flagged, |c, v| c.flagged = v);
        table.no_args_constructor(Customer::default);
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(id={}, name={:?}, points={:?}, joined={:?}, flagged={})",
            self.id, self.name, self.points, self.joined, self.flagged
        )
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = SpecSettings::from_json(
        r#"{
            "null_replacement": "NULL",
            "positions": { "joined": "first" }
        }"#,
    )?;

    let spec = TypeSpec::<Customer>::for_type()
        .settings(&settings)
        .position("id", LAST_POSITION)
        .build()?;

    let customers = vec![
        Customer {
            id: 1,
            name: Some("Abc".to_string()),
            points: Some(Decimal::new(1593, 2)),
            joined: NaiveDate::from_ymd_opt(2010, 4, 17),
            flagged: false,
        },
        Customer {
            id: 2,
            name: None,
            points: None,
            joined: NaiveDate::from_ymd_opt(2021, 11, 2),
            flagged: true,
        },
    ];

    let path = temp_dir().join("customer_lines.txt");

    let writer = DelimitedItemWriterBuilder::new()
        .has_headers(true)
        .from_path(&spec, &path)?;
    writer.write(&customers)?;
    writer.flush()?;

    info!("Written to {}:\n{}", path.display(), fs::read_to_string(&path)?);

    let reader = DelimitedItemReaderBuilder::new(&spec)
        .has_headers(true)
        .from_path(&path)?;

    while let Some(customer) = reader.read()? {
        info!("Read {}", customer);
    }

    Ok(())
}
