//! Customer fixtures in the three shapes a record can take.
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use typespec_rs::core::field::{FieldTable, LAST_POSITION, Record};

pub fn joined() -> NaiveDate {
    NaiveDate::from_ymd_opt(2010, 4, 17).unwrap()
}

pub fn last_access() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 3, 4)
        .unwrap()
        .and_hms_opt(14, 56, 0)
        .unwrap()
}

pub fn points() -> Decimal {
    Decimal::new(1593, 2)
}

/// Immutable customer, built through its all-args constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerAsValueType {
    id: i32,
    name: Option<String>,
    surname: Option<String>,
    points: Option<Decimal>,
    joined: Option<NaiveDate>,
    last_access: Option<NaiveDateTime>,
    flagged: bool,
}

impl CustomerAsValueType {
    pub fn new(
        id: i32,
        name: Option<String>,
        surname: Option<String>,
        points: Option<Decimal>,
        joined: Option<NaiveDate>,
        last_access: Option<NaiveDateTime>,
        flagged: bool,
    ) -> Self {
        Self {
            id,
            name,
            surname,
            points,
            joined,
            last_access,
            flagged,
        }
    }

    pub fn sample() -> Self {
        Self::new(
            1,
            Some("Abc".to_string()),
            Some("Def".to_string()),
            Some(points()),
            Some(joined()),
            Some(last_access()),
            false,
        )
    }

    pub fn without_name() -> Self {
        Self {
            name: None,
            ..Self::sample()
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }
}

impl Record for CustomerAsValueType {
    fn describe(table: &mut FieldTable<Self>) {
        table.field("id", |c: &Self| c.id);
        table.field("name", |c: &Self| c.name.clone());
        table.field("surname", |c: &Self| c.surname.clone());
        table.field("points", |c: &Self| c.points);
        table.field("joined", |c: &Self| c.joined);
        table.field("last_access", |c: &Self| c.last_access);
        table.field("flagged", |c: &Self| c.flagged);
        table.all_args_constructor(|args| {
            Ok(Self::new(
                args.next()?,
                args.next()?,
                args.next()?,
                args.next()?,
                args.next()?,
                args.next()?,
                args.next()?,
            ))
        });
    }
}

/// Mutable customer, populated through its setters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerAsBean {
    pub id: i32,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub points: Option<Decimal>,
    pub joined: Option<NaiveDate>,
    pub last_access: Option<NaiveDateTime>,
    pub flagged: bool,
}

impl CustomerAsBean {
    pub fn sample() -> Self {
        Self {
            id: 1,
            name: Some("Abc".to_string()),
            surname: Some("Def".to_string()),
            points: Some(points()),
            joined: Some(joined()),
            last_access: Some(last_access()),
            flagged: false,
        }
    }
}

impl Record for CustomerAsBean {
    fn describe(table: &mut FieldTable<Self>) {
        table.property("id", |c: &Self| c.id, |c, v| c.id = v);
        table.property("name", |c: &Self| c.name.clone(), |c, v| c.name = v);
        table.property("surname", |c: &Self| c.surname.clone(), |c, v| c.surname = v);
        table.property("points", |c: &Self| c.points, |c, v| c.points = v);
        table.property("joined", |c: &Self| c.joined, |c, v| c.joined = v);
        table.property("last_access", |c: &Self| c.last_access, |c, v| c.last_access = v);
        table.property("flagged", |c: &Self| c.flagged, |c, v| c.flagged = v);
        table.no_args_constructor(CustomerAsBean::default);
    }
}

/// Same customer, with default positions declared in its field table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerWithDeclaredPositions(pub CustomerAsBean);

impl Record for CustomerWithDeclaredPositions {
    fn describe(table: &mut FieldTable<Self>) {
        table
            .property("id", |c: &Self| c.0.id, |c, v| c.0.id = v)
            .position(LAST_POSITION);
        table
            .property("name", |c: &Self| c.0.name.clone(), |c, v| c.0.name = v)
            .position(2);
        table
            .property("surname", |c: &Self| c.0.surname.clone(), |c, v| c.0.surname = v)
            .position(3);
        table
            .property("points", |c: &Self| c.0.points, |c, v| c.0.points = v)
            .position(4);
        table
            .property("joined", |c: &Self| c.0.joined, |c, v| c.0.joined = v)
            .position(0);
        table
            .property("last_access", |c: &Self| c.0.last_access, |c, v| c.0.last_access = v)
            .position(5);
        table
            .property("flagged", |c: &Self| c.0.flagged, |c, v| c.0.flagged = v)
            .position(1);
        table.no_args_constructor(CustomerWithDeclaredPositions::default);
    }
}
