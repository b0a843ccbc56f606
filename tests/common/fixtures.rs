//! Static engine responses used across harnesses, one per aggregation shape.

use serde_json::{json, Value};

/// Label names used by the property tests.
pub const LABELS: &[&str] = &["sky", "leaf", "sand", "brick", "ink"];

/// Response to the flat `terms` aggregation.
pub fn flat_response() -> Value {
    json!({
        "hits": { "total": { "value": 7 } },
        "aggregations": {
            "colorPickerTerms": {
                "doc_count_error_upper_bound": 0,
                "sum_other_doc_count": 0,
                "buckets": [
                    { "key": "sky", "doc_count": 4 },
                    { "key": "leaf", "doc_count": 2 },
                    { "key": "sand", "doc_count": 1 }
                ]
            }
        }
    })
}

/// Response to `nested → terms`.
pub fn nested_response() -> Value {
    json!({
        "aggregations": {
            "colorPickerTerms": {
                "doc_count": 15,
                "colorPickerTerms": {
                    "buckets": [
                        { "key": "sky", "doc_count": 9 },
                        { "key": "leaf", "doc_count": 6 }
                    ]
                }
            }
        }
    })
}

/// Response to `nested → terms → reverse_nested`.
pub fn parent_count_response() -> Value {
    json!({
        "aggregations": {
            "colorPickerTerms": {
                "doc_count": 15,
                "labels": {
                    "buckets": [
                        { "key": "sky", "doc_count": 9, "files": { "doc_count": 3 } },
                        { "key": "leaf", "doc_count": 6, "files": { "doc_count": 5 } }
                    ]
                }
            }
        }
    })
}
