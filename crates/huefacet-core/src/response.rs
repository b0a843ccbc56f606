//! Reading label counts back from an engine response.
//!
//! The bucket layout mirrors the aggregation shape chosen by
//! [`build_aggregation`](crate::query::build_aggregation):
//!
//! ```text
//! flat            <key>.buckets[]                 { key, doc_count }
//! nested          <key>.<key>.buckets[]           { key, doc_count }
//! reverse nested  <key>.labels.buckets[]          { key, doc_count, files: { doc_count } }
//! ```
//!
//! In the reverse-nested shape the parent-level `files.doc_count` is reported
//! as the bucket's count.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::FieldConfig;
use crate::error::ResponseError;
use crate::query::{FILES_KEY, LABELS_KEY};

/// One label and the number of documents carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelBucket {
    pub key: String,
    pub doc_count: u64,
}

/// Parse label buckets from the `aggregations` object of a response.
pub fn parse_label_buckets(
    aggregations: &Value,
    config: &FieldConfig,
) -> Result<Vec<LabelBucket>, ResponseError> {
    let key = config.aggregation_key.as_str();
    let root = child(aggregations, key, key)?;

    let (container, path, parent_count) = match config.aggregation_scope() {
        None => (root, key.to_string(), false),
        Some(_) if config.parent_doc_count => {
            let path = format!("{key}.{LABELS_KEY}");
            (child(root, LABELS_KEY, &path)?, path, true)
        }
        Some(_) => {
            let path = format!("{key}.{key}");
            (child(root, key, &path)?, path, false)
        }
    };

    let buckets = container
        .get("buckets")
        .and_then(Value::as_array)
        .ok_or_else(|| ResponseError::MissingBuckets(path.clone()))?;

    let parsed = buckets
        .iter()
        .enumerate()
        .map(|(index, bucket)| parse_bucket(bucket, parent_count, &path, index))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(path = %path, buckets = parsed.len(), "response: label buckets parsed");
    Ok(parsed)
}

/// Parse label buckets from a full response body (`{ "aggregations": ... }`).
pub fn parse_response(response: &Value, config: &FieldConfig) -> Result<Vec<LabelBucket>, ResponseError> {
    let aggregations = child(response, "aggregations", "aggregations")?;
    parse_label_buckets(aggregations, config)
}

fn child<'a>(value: &'a Value, key: &str, path: &str) -> Result<&'a Value, ResponseError> {
    value
        .get(key)
        .ok_or_else(|| ResponseError::MissingAggregation(path.to_string()))
}

fn parse_bucket(
    bucket: &Value,
    parent_count: bool,
    path: &str,
    index: usize,
) -> Result<LabelBucket, ResponseError> {
    let malformed = |reason: &'static str| ResponseError::MalformedBucket {
        path: path.to_string(),
        index,
        reason,
    };

    // Keyword buckets carry strings; numeric label fields carry numbers.
    let key = match bucket.get("key") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => return Err(malformed("missing key")),
    };

    let count = if parent_count {
        bucket.get(FILES_KEY).and_then(|f| f.get("doc_count"))
    } else {
        bucket.get("doc_count")
    };
    let doc_count = count
        .and_then(Value::as_u64)
        .ok_or_else(|| malformed("missing doc_count"))?;

    Ok(LabelBucket { key, doc_count })
}
