mod common;

use common::{CustomerAsBean, CustomerAsValueType};
use typespec_rs::{
    core::{
        converter::Converter,
        field::{FieldTable, Record},
        type_spec::{TypeSpec, TypeSpecBuilder},
        value::{FieldType, Value, ValueKind},
    },
    error::{FormatError, TypeSpecError},
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Percent(u8);

impl FieldType for Percent {
    const KIND: ValueKind = ValueKind::Custom("percent");

    fn into_value(self) -> Option<Value> {
        Some(Value::Integer(i64::from(self.0)))
    }

    fn from_value(value: Option<Value>) -> Result<Self, String> {
        match value.as_ref().and_then(Value::as_integer) {
            Some(integer) => u8::try_from(integer)
                .map(Percent)
                .map_err(|error| error.to_string()),
            None => Err("percent value is required".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Discount {
    code: String,
    rate: Option<Percent>,
}

impl Record for Discount {
    fn describe(table: &mut FieldTable<Self>) {
        table.property("code", |d: &Discount| d.code.clone(), |d, v| d.code = v);
        table.property("rate", |d: &Discount| d.rate, |d, v| d.rate = v);
        table.no_args_constructor(Discount::default);
    }
}

fn percent_converter() -> Converter {
    Converter::new(
        |value| format!("{}%", value),
        |text| {
            text.strip_suffix('%')
                .ok_or_else(|| format!("`{}` has no % sign", text))?
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|error| error.to_string())
        },
    )
}

#[test]
fn build_fails_for_kind_without_converter() {
    let result = TypeSpec::<Discount>::for_type().build();

    assert_eq!(
        result.err(),
        Some(TypeSpecError::UnsupportedKind {
            field: "rate".to_string(),
            kind: ValueKind::Custom("percent"),
        })
    );
}

#[test]
fn registered_converter_supports_custom_kind() {
    let spec = TypeSpec::<Discount>::for_type()
        .converter(ValueKind::Custom("percent"), percent_converter())
        .null_replacement("-")
        .build()
        .unwrap();

    let discount = Discount {
        code: "SPRING".to_string(),
        rate: Some(Percent(15)),
    };
    assert_eq!(spec.serialize(&discount), "SPRING;15%");
    assert_eq!(spec.deserialize("SPRING;15%").unwrap(), discount);

    let no_rate = Discount {
        code: "NONE".to_string(),
        rate: None,
    };
    assert_eq!(spec.serialize(&no_rate), "NONE;-");
    assert_eq!(spec.deserialize("NONE;-").unwrap(), no_rate);

    match spec.deserialize("SPRING;300%") {
        Err(TypeSpecError::Format(FormatError::InvalidToken { field, token, .. })) => {
            assert_eq!(field, "rate");
            assert_eq!(token, "300%");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn build_fails_for_unknown_position_field() {
    let result = TypeSpec::<CustomerAsValueType>::for_type()
        .position("nickname", 0)
        .build();

    assert_eq!(
        result.err(),
        Some(TypeSpecError::UnknownField("nickname".to_string()))
    );
}

#[test]
fn build_fails_for_duplicate_field() {
    let mut table = FieldTable::<CustomerAsBean>::new();
    table.field("id", |c: &CustomerAsBean| c.id);
    table.field("id", |c: &CustomerAsBean| c.name.clone());
    table.no_args_constructor(CustomerAsBean::default);

    let result = TypeSpecBuilder::with_table(table).build();
    assert!(matches!(result, Err(TypeSpecError::Descriptor(_))));
}

#[test]
fn build_fails_without_constructor() {
    let mut table = FieldTable::<CustomerAsBean>::new();
    table.field("id", |c: &CustomerAsBean| c.id);

    let result = TypeSpecBuilder::with_table(table).build();
    assert!(matches!(result, Err(TypeSpecError::Descriptor(_))));
}

#[test]
fn build_fails_for_read_only_field_of_mutable_type() {
    let mut table = FieldTable::<CustomerAsBean>::new();
    table.property("id", |c: &CustomerAsBean| c.id, |c, v| c.id = v);
    table.field("flagged", |c: &CustomerAsBean| c.flagged);
    table.no_args_constructor(CustomerAsBean::default);

    let result = TypeSpecBuilder::with_table(table).build();
    assert!(matches!(result, Err(TypeSpecError::Descriptor(_))));
}

#[test]
fn deserialize_fails_on_token_count() {
    let spec = TypeSpec::<CustomerAsValueType>::for_type().build().unwrap();

    assert_eq!(
        spec.deserialize("1;Abc;Def").err(),
        Some(TypeSpecError::Format(FormatError::TokenCount {
            expected: 7,
            found: 3,
        }))
    );
    assert_eq!(
        spec.deserialize("1;Abc;Def;15.93;2010-04-17;2022-03-04T14:56:00;false;extra")
            .err(),
        Some(TypeSpecError::Format(FormatError::TokenCount {
            expected: 7,
            found: 8,
        }))
    );
}

#[test]
fn deserialize_fails_on_invalid_token() {
    let spec = TypeSpec::<CustomerAsValueType>::for_type().build().unwrap();

    let error = spec
        .deserialize("1;Abc;Def;15.93;17/04/2010;2022-03-04T14:56:00;false")
        .unwrap_err();

    match &error {
        TypeSpecError::Format(FormatError::InvalidToken { field, token, .. }) => {
            assert_eq!(field, "joined");
            assert_eq!(token, "17/04/2010");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(error.to_string().contains("`joined`"));
}

#[test]
fn deserialize_fails_on_null_for_required_field() {
    let spec = TypeSpec::<CustomerAsBean>::for_type()
        .null_replacement("NULL")
        .build()
        .unwrap();

    let result = spec.deserialize("1;Abc;Def;15.93;2010-04-17;2022-03-04T14:56:00;NULL");

    assert_eq!(
        result.err(),
        Some(TypeSpecError::Format(FormatError::InvalidToken {
            field: "flagged".to_string(),
            token: "NULL".to_string(),
            reason: "boolean value is required".to_string(),
        }))
    );
}

#[test]
fn deserialize_fails_on_out_of_range_integer() {
    let spec = TypeSpec::<CustomerAsValueType>::for_type().build().unwrap();

    let result = spec.deserialize("99999999999;Abc;Def;15.93;2010-04-17;2022-03-04T14:56:00;false");

    assert!(matches!(
        result,
        Err(TypeSpecError::Format(FormatError::InvalidToken { ref field, .. })) if field == "id"
    ));
}
