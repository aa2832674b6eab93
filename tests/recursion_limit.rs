use jsonbind::{ErrorCode, Value};
use std::thread;

fn make_nested_array(depth: usize) -> String {
    let mut json = String::from("null");
    for _ in 0..depth {
        json = format!("[{}]", json);
    }
    json
}

fn make_nested_object(depth: usize) -> String {
    let mut json = String::from("null");
    for _ in 0..depth {
        json = format!(r#"{{"a":{}}}"#, json);
    }
    json
}

// Every open container keeps one decoder frame on the call stack, so the
// tests that push right up against the limit get a thread with explicit
// stack head-room.
fn on_big_stack<F>(f: F)
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .stack_size(8 * 1024 * 1024)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap();
}

#[test]
fn depth_1000_decodes_and_encodes() {
    let json = make_nested_array(1000);
    let value = jsonbind::from_str(&json).unwrap();
    assert_eq!(jsonbind::to_string(&value).unwrap(), json);

    let json = make_nested_object(1000);
    let value = jsonbind::from_str(&json).unwrap();
    assert_eq!(jsonbind::to_string(&value).unwrap(), json);
}

#[test]
fn limit_allows_depth_1023() {
    on_big_stack(|| {
        let json = make_nested_array(1023);
        let result: jsonbind::Result<Value> = jsonbind::from_str(&json);
        assert!(result.is_ok(), "depth 1023 should succeed with limit 1024");
    });
}

#[test]
fn limit_rejects_depth_1024() {
    on_big_stack(|| {
        let json = make_nested_array(1024);
        let err = jsonbind::from_str(&json).unwrap_err();
        assert_eq!(*err.code(), ErrorCode::RecursionLimitExceeded);
        assert!(err.is_syntax());
        assert_eq!(err.position(), Some(1024));
        assert!(
            err.to_string().contains("recursion limit"),
            "error should mention the recursion limit, got: {}",
            err
        );

        let json = make_nested_object(1024);
        let err = jsonbind::from_str(&json).unwrap_err();
        assert_eq!(*err.code(), ErrorCode::RecursionLimitExceeded);
    });
}

#[test]
fn objects_and_arrays_share_the_limit() {
    // Each round nests one array and one object, so 511 rounds stay under
    // the limit and 512 rounds land exactly on it.
    on_big_stack(|| {
        let mut json = String::from("null");
        for _ in 0..511 {
            json = format!(r#"[{{"a":{}}}]"#, json);
        }
        assert!(jsonbind::from_str(&json).is_ok());

        let mut json = String::from("null");
        for _ in 0..512 {
            json = format!(r#"[{{"a":{}}}]"#, json);
        }
        let err = jsonbind::from_str(&json).unwrap_err();
        assert_eq!(*err.code(), ErrorCode::RecursionLimitExceeded);
    });
}

#[test]
fn typed_decodes_share_the_guard() {
    on_big_stack(|| {
        let json = make_nested_array(1024);
        let err = jsonbind::bind_str::<Vec<i64>>(&json).unwrap_err();
        assert_eq!(*err.code(), ErrorCode::RecursionLimitExceeded);
    });
}

#[test]
fn flat_structures_are_not_affected() {
    let mut json = String::from("[");
    for i in 0..10000 {
        if i > 0 {
            json.push(',');
        }
        json.push_str(&i.to_string());
    }
    json.push(']');

    let value = jsonbind::from_str(&json).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 10000);
}
