use jsonbind::{Map, Number, Value};

#[test]
fn number() {
    assert_eq!(format!("{:?}", Number::from(1)), "Number(1)");
    assert_eq!(format!("{:?}", Number::from(-1)), "Number(-1)");
    assert_eq!(
        format!("{:?}", Number::from(u64::MAX)),
        "Number(18446744073709551615)"
    );
    assert_eq!(format!("{:?}", Number::from_f64(1.0).unwrap()), "Number(1.0)");
}

#[test]
fn value_null() {
    assert_eq!(format!("{:?}", Value::Null), "Null");
}

#[test]
fn value_bool() {
    assert_eq!(format!("{:?}", Value::Bool(true)), "Bool(true)");
    assert_eq!(format!("{:?}", Value::Bool(false)), "Bool(false)");
}

#[test]
fn value_number() {
    assert_eq!(format!("{:?}", Value::from(1)), "Number(1)");
    assert_eq!(format!("{:?}", Value::from(-1)), "Number(-1)");
    assert_eq!(format!("{:?}", Value::from(1.0)), "Number(1.0)");
}

#[test]
fn value_string() {
    assert_eq!(format!("{:?}", Value::from("s")), "String(\"s\")");
}

#[test]
fn value_array() {
    assert_eq!(format!("{:?}", Value::Array(Vec::new())), "Array []");
    assert_eq!(
        format!("{:?}", Value::Array(vec![Value::from(1)])),
        "Array [Number(1)]"
    );
}

#[test]
fn value_object() {
    assert_eq!(format!("{:?}", Value::Object(Map::new())), "Object {}");

    let mut map = Map::new();
    map.insert("a".to_owned(), Value::from(1));
    assert_eq!(
        format!("{:?}", Value::Object(map)),
        "Object {\"a\": Number(1)}"
    );
}

#[test]
fn error() {
    let err = jsonbind::from_str("[true false]").unwrap_err();
    assert_eq!(
        format!("{:?}", err),
        "Error(\"expected `,` or `]`\", position: 11)"
    );

    let err = jsonbind::bind_str::<bool>("null").unwrap_err();
    assert_eq!(
        format!("{:?}", err),
        "Error(\"value cannot be bound to `bool`\")"
    );
}
