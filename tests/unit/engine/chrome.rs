use serde_json::json;

use super::*;

fn reply(v: Value) -> EvaluateReturnObject {
    serde_json::from_value(v).unwrap()
}

#[test]
fn plain_result_passes_through() {
    let obj = evaluation_result(reply(json!({
        "result": { "type": "string", "value": "<svg/>" }
    })))
    .unwrap();
    assert_eq!(obj.value, Some(json!("<svg/>")));
}

#[test]
fn rejected_string_is_an_error_not_a_result() {
    let err = evaluation_result(reply(json!({
        "result": { "type": "string", "value": "bad" },
        "exceptionDetails": {
            "exceptionId": 1,
            "text": "Uncaught (in promise)",
            "lineNumber": 0,
            "columnNumber": 0,
            "exception": { "type": "string", "value": "bad" }
        }
    })))
    .unwrap_err();
    assert_eq!(err.to_string(), "script error: Uncaught (in promise): bad");
}

#[test]
fn thrown_object_is_an_error() {
    let err = evaluation_result(reply(json!({
        "result": { "type": "object", "className": "Object", "description": "Object" },
        "exceptionDetails": {
            "exceptionId": 2,
            "text": "Uncaught",
            "lineNumber": 0,
            "columnNumber": 0,
            "exception": { "type": "object", "className": "Object", "description": "Object" }
        }
    })))
    .unwrap_err();
    assert_eq!(err.to_string(), "script error: Uncaught: Object");
}

#[test]
fn thrown_error_keeps_only_its_message_line() {
    let description = "Error: Parse error on line 2\n    at renderSVG (<anonymous>:1:1)";
    let err = evaluation_result(reply(json!({
        "result": { "type": "object", "subtype": "error", "description": description },
        "exceptionDetails": {
            "exceptionId": 3,
            "text": "Uncaught",
            "lineNumber": 0,
            "columnNumber": 0,
            "exception": { "type": "object", "subtype": "error", "description": description }
        }
    })))
    .unwrap_err();
    assert_eq!(err.to_string(), "script error: Uncaught: Error: Parse error on line 2");
}

#[test]
fn exception_without_thrown_value_uses_its_text() {
    let err = evaluation_result(reply(json!({
        "result": { "type": "undefined" },
        "exceptionDetails": {
            "exceptionId": 4,
            "text": "SyntaxError: Unexpected token ')'",
            "lineNumber": 0,
            "columnNumber": 7
        }
    })))
    .unwrap_err();
    assert_eq!(err.to_string(), "script error: SyntaxError: Unexpected token ')'");
}

#[test]
fn returned_error_object_is_an_error() {
    let err = evaluation_result(reply(json!({
        "result": { "type": "object", "subtype": "error", "description": "Error: nope\n    at x" }
    })))
    .unwrap_err();
    assert_eq!(err.to_string(), "script error: Error: nope");
}
