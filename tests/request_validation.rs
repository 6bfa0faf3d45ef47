//! Envelope parsing and validation, checked on both execution paths.

use jrpc_dispatch::RequestInput;
use jrpc_dispatch_integration_tests::{both_paths, init_tracing, lookup, quiet_dispatcher, req};
use serde_json::{Value, json};

#[test]
fn test_malformed_text_is_parse_error() {
    init_tracing();
    let dispatcher = quiet_dispatcher();
    let template = serde_json::to_string(&req("test_args", Some(json!(123)), 0)).unwrap();

    for broken in ["dsfsdfds}ew223}", "{123}}", "self"] {
        let text = template.replace("123", broken);
        for response in both_paths(&dispatcher, RequestInput::Text(text.clone())) {
            assert_eq!(lookup(&response, "error.message"), "Parse error", "input: {}", text);
            assert_eq!(lookup(&response, "error.code"), -32700);
            assert_eq!(response["id"], Value::Null);
            assert_eq!(response["jsonrpc"], "2.0");
        }
    }
}

#[test]
fn test_top_level_scalar_is_parse_error() {
    let dispatcher = quiet_dispatcher();
    for input in ["42", "\"text\"", "null", "true"] {
        for response in both_paths(&dispatcher, input.into()) {
            assert_eq!(lookup(&response, "error.message"), "Parse error");
        }
    }
}

#[test]
fn test_missing_fields_are_invalid_request() {
    let dispatcher = quiet_dispatcher();
    let requests = [
        json!({"method": "test_no_params", "id": 1}),
        json!({"jsonrpc": "2.0", "method": "test_no_params"}),
        json!({"jsonrpc": "2.0", "id": 1}),
        json!({"jsonrpc": "1.0", "method": "test_no_params", "id": 1}),
        json!({"jsonrpc": 2, "method": "test_no_params", "id": 1}),
    ];

    for request in requests {
        for response in both_paths(&dispatcher, request.clone().into()) {
            assert_eq!(
                lookup(&response, "error.message"),
                "Invalid Request",
                "request: {}",
                request
            );
            assert_eq!(lookup(&response, "error.code"), -32600);
            assert_eq!(response["id"], Value::Null);
            assert!(response.get("result").is_none());
        }
    }
}

#[test]
fn test_unknown_method_keeps_id() {
    let dispatcher = quiet_dispatcher();
    for params in [None, Some(json!({"a": 1, "d": 22})), Some(json!("not structured"))] {
        let request = req("test_not_found_method", params, 41);
        for response in both_paths(&dispatcher, request.into()) {
            assert_eq!(lookup(&response, "error.message"), "Method not found");
            assert_eq!(lookup(&response, "error.code"), -32601);
            assert_eq!(response["id"], 41);
        }
    }
}

#[test]
fn test_string_and_null_ids_are_echoed() {
    let dispatcher = quiet_dispatcher();

    let request = json!({"jsonrpc": "2.0", "method": "test_no_params", "id": "abc-1"});
    for response in both_paths(&dispatcher, request.into()) {
        assert_eq!(response, json!({"jsonrpc": "2.0", "id": "abc-1", "result": 100}));
    }

    let request = json!({"jsonrpc": "2.0", "method": "test_no_params", "id": null});
    for response in both_paths(&dispatcher, request.into()) {
        assert_eq!(response, json!({"jsonrpc": "2.0", "id": null, "result": 100}));
    }
}

#[test]
fn test_identical_requests_give_identical_responses() {
    let dispatcher = quiet_dispatcher();
    let text = r#"{"jsonrpc": "2.0", "method": "test_kwargs", "params": {"a": 4}, "id": 9}"#;

    let first = dispatcher.dispatch(text).to_json_string().unwrap();
    let second = dispatcher.dispatch(text).to_json_string().unwrap();
    assert_eq!(first, second);
    assert_eq!(first, r#"{"jsonrpc":"2.0","id":9,"result":4}"#);
}

#[test]
fn test_bound_context_is_the_dispatcher() {
    let dispatcher = quiet_dispatcher();
    for response in both_paths(&dispatcher, req("test_self", None, 1).into()) {
        let methods = response["result"]["methods"].as_array().unwrap();
        assert!(methods.contains(&json!("test_self")));
        assert!(methods.contains(&json!("test_args")));
        assert_eq!(response["result"]["verbose"], false);
    }
}
