use jsonbind::{record, Map};

record! {
    #[derive(Debug, PartialEq)]
    struct Model {
        i: i64,
        d: f64,
        s: String,
        b: bool,
        models: Vec<Model>,
    }
}

#[test]
fn bind_record_fields_by_name() {
    let m: Model = jsonbind::bind_str(r#"{"i":123,"d":1.0,"s":"xyz","b":true}"#).unwrap();
    assert_eq!(m.i, 123);
    assert_eq!(m.d, 1.0);
    assert_eq!(m.s, "xyz");
    assert!(m.b);
    assert!(m.models.is_empty());
}

#[test]
fn bind_root_list() {
    let v: Vec<i64> = jsonbind::bind_str("[1,2,3]").unwrap();
    assert_eq!(v, [1, 2, 3]);

    let v: Vec<String> = jsonbind::bind_str(r#"["a","b"]"#).unwrap();
    assert_eq!(v, ["a", "b"]);
}

#[test]
fn bind_nested_record_lists() {
    let m: Model =
        jsonbind::bind_str(r#"{"s":"root","models":[{"i":2,"s":"child"},{"i":3}]}"#).unwrap();
    assert_eq!(m.s, "root");
    assert_eq!(m.models.len(), 2);
    assert_eq!(m.models[0].i, 2);
    assert_eq!(m.models[0].s, "child");
    assert_eq!(m.models[1].i, 3);
    assert!(m.models[1].models.is_empty());
}

#[test]
fn unknown_properties_are_skipped() {
    let m: Model =
        jsonbind::bind_str(r#"{"i":1,"extra":"x","deeper":{"a":[1,{"b":2}]},"d":2.5}"#).unwrap();
    assert_eq!(m.i, 1);
    assert_eq!(m.d, 2.5);
    assert_eq!(m.s, "");
    assert!(!m.b);
}

#[test]
fn scalars_coerce_into_field_types() {
    let m: Model = jsonbind::bind_str(r#"{"i":"42","d":"0.5","s":99,"b":1}"#).unwrap();
    assert_eq!(m.i, 42);
    assert_eq!(m.d, 0.5);
    assert_eq!(m.s, "99");
    assert!(m.b);

    // Floats truncate toward zero on the way into an integer field.
    let m: Model = jsonbind::bind_str(r#"{"i":1.9}"#).unwrap();
    assert_eq!(m.i, 1);
    let m: Model = jsonbind::bind_str(r#"{"i":-1.9}"#).unwrap();
    assert_eq!(m.i, -1);
}

#[test]
fn nulls_and_failed_conversions_keep_defaults() {
    let m: Model = jsonbind::bind_str(r#"{"i":null,"s":null,"b":null}"#).unwrap();
    assert_eq!(m.i, 0);
    assert_eq!(m.s, "");
    assert!(!m.b);
}

#[test]
fn mismatched_shapes_keep_defaults() {
    let m: Model =
        jsonbind::bind_str(r#"{"i":{"nested":1},"models":"not a list","d":[1,2]}"#).unwrap();
    assert_eq!(m.i, 0);
    assert_eq!(m.d, 0.0);
    assert!(m.models.is_empty());
}

record! {
    #[derive(Debug, PartialEq)]
    struct Sample {
        label: String,
        scale: Option<f64>,
        tags: Option<Vec<String>>,
    }
}

#[test]
fn option_fields_distinguish_null_from_value() {
    let s: Sample = jsonbind::bind_str(r#"{"label":"a","scale":null}"#).unwrap();
    assert_eq!(s.label, "a");
    assert_eq!(s.scale, None);
    assert_eq!(s.tags, None);

    let s: Sample = jsonbind::bind_str(r#"{"label":"a","scale":2.5,"tags":["x"]}"#).unwrap();
    assert_eq!(s.scale, Some(2.5));
    assert_eq!(s.tags, Some(vec!["x".to_owned()]));
}

record! {
    struct Grid {
        cell: [f64; 2],
    }
}

#[test]
fn fixed_arrays_require_exact_arity() {
    let a: [i64; 3] = jsonbind::bind_str("[1,2,3]").unwrap();
    assert_eq!(a, [1, 2, 3]);

    let err = jsonbind::bind_str::<[i64; 3]>("[1,2]").unwrap_err();
    assert!(err.is_data());

    let g: Grid = jsonbind::bind_str(r#"{"cell":[0.5,1.5]}"#).unwrap();
    assert_eq!(g.cell, [0.5, 1.5]);

    // A wrong arity in a field declines the value and keeps the default.
    let g: Grid = jsonbind::bind_str(r#"{"cell":[0.5]}"#).unwrap();
    assert_eq!(g.cell, [0.0, 0.0]);
}

record! {
    struct Config {
        limits: Map<String, i64>,
    }
}

#[test]
fn map_fields_accept_arbitrary_keys() {
    let counts: Map<String, i64> = jsonbind::bind_str(r#"{"x":1,"y":2}"#).unwrap();
    assert_eq!(counts["x"], 1);
    assert_eq!(counts["y"], 2);
    let keys: Vec<_> = counts.keys().collect();
    assert_eq!(keys, ["x", "y"]);

    let c: Config = jsonbind::bind_str(r#"{"limits":{"depth":4,"width":8}}"#).unwrap();
    assert_eq!(c.limits["depth"], 4);
    assert_eq!(c.limits["width"], 8);
}

record! {
    struct Wide {
        n: u64,
    }
}

#[test]
fn in_range_integers_bind_exactly() {
    let w: Wide = jsonbind::bind_str(r#"{"n":18446744073709551615}"#).unwrap();
    assert_eq!(w.n, u64::MAX);
}

#[test]
fn bind_root_scalars() {
    assert_eq!(jsonbind::bind_str::<i64>("42").unwrap(), 42);
    assert_eq!(jsonbind::bind_str::<f64>("0.12").unwrap(), 0.12);
    assert_eq!(jsonbind::bind_str::<String>("\"hi\"").unwrap(), "hi");
    assert!(jsonbind::bind_str::<bool>("true").unwrap());

    // Coercion applies at the root too.
    assert_eq!(jsonbind::bind_str::<i64>("\"7\"").unwrap(), 7);
    assert_eq!(jsonbind::bind_str::<Option<i64>>("null").unwrap(), None);
    assert_eq!(jsonbind::bind_str::<Option<i64>>("7").unwrap(), Some(7));
}

#[test]
fn unbindable_roots_report_a_type_mismatch() {
    let err = jsonbind::bind_str::<i64>("{}").unwrap_err();
    assert!(err.is_data());
    assert_eq!(err.position(), None);
    assert!(err.to_string().contains("i64"));

    let err = jsonbind::bind_str::<Model>("[1,2]").unwrap_err();
    assert!(err.is_data());
    assert!(err.to_string().contains("Model"));

    let err = jsonbind::bind_str::<i64>("null").unwrap_err();
    assert!(err.is_data());

    // Syntax problems stay syntax errors.
    let err = jsonbind::bind_str::<Model>(r#"{"i""#).unwrap_err();
    assert!(err.is_syntax());
}

#[test]
fn bind_from_slice_and_reader() {
    let m: Model = jsonbind::bind_slice(br#"{"i":5}"#).unwrap();
    assert_eq!(m.i, 5);

    let m: Model = jsonbind::bind_reader(&br#"{"i":6}"#[..]).unwrap();
    assert_eq!(m.i, 6);
}

#[test]
fn records_encode_in_declaration_order() {
    let m = Model {
        i: 1,
        d: 1.2,
        s: "xxx".to_owned(),
        b: false,
        models: vec![Model {
            i: 2,
            d: 5.6,
            s: "yyy".to_owned(),
            b: true,
            models: Vec::new(),
        }],
    };
    assert_eq!(
        jsonbind::to_string(&m).unwrap(),
        r#"{"i":1,"d":1.2,"s":"xxx","b":false,"models":[{"i":2,"d":5.6,"s":"yyy","b":true,"models":[]}]}"#,
    );
}

#[test]
fn records_round_trip() {
    let m = Model {
        i: -7,
        d: 0.25,
        s: "tab\there".to_owned(),
        b: true,
        models: vec![Model::default()],
    };
    let text = jsonbind::to_string(&m).unwrap();
    let back: Model = jsonbind::bind_str(&text).unwrap();
    assert_eq!(back, m);
}

record! {
    struct Empty {}
}

#[test]
fn zero_field_records() {
    let text = jsonbind::to_string(&Empty::default()).unwrap();
    assert_eq!(text, "{}");
    let _: Empty = jsonbind::bind_str("{}").unwrap();
    let _: Empty = jsonbind::bind_str(r#"{"anything":["goes",{}]}"#).unwrap();
}
