//! Fill artifact persistence: write/read a [`Fill`] as JSON with a digest.
//!
//! # File layout (`fill.v1`)
//!
//! ```text
//! {
//!   "digest": "sha256:<hex>",        over the body serialized without it
//!   "metric": "reciprocal-intensity",
//!   "nodes": [[x, y, z, distance, predecessor|null, open], ...],
//!   "schema_version": "fill.v1",
//!   "source_paths": [ids...],
//!   "spacing": [x, y, z],
//!   "threshold": t,
//!   "unit": "µm"
//! }
//! ```
//!
//! Node order is significant: closed entries first, then open, exactly as
//! extracted, so `FillSearch::from_fill` can resume from the file without
//! re-running anything.
//!
//! # Fail-closed semantics
//!
//! - Unknown schema version or metric label → error
//! - Malformed node entry or dangling predecessor index → error
//! - Digest mismatch against the recomputed body → error

use std::path::Path;

use axon_search::fill::{Fill, FillMetric, FillNode};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Schema identifier written into and required from every fill file.
pub const FILL_SCHEMA_VERSION: &str = "fill.v1";

/// Error reading or writing a fill artifact.
#[derive(Debug)]
pub enum FillIoError {
    /// I/O failure.
    Io { detail: String },
    /// The file is not valid JSON.
    Parse { detail: String },
    /// `schema_version` is not recognized.
    SchemaVersionMismatch { found: String },
    /// A required top-level field is missing or has the wrong shape.
    FieldInvalid { field: &'static str },
    /// The metric label is not one the cost models produce.
    UnknownMetric { label: String },
    /// A node entry is not a well-formed `[x,y,z,distance,pred,open]` row.
    MalformedNode { index: usize, detail: String },
    /// The stored digest does not match the recomputed body digest.
    DigestMismatch { stored: String, recomputed: String },
}

impl std::fmt::Display for FillIoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::Parse { detail } => write!(f, "fill parse error: {detail}"),
            Self::SchemaVersionMismatch { found } => {
                write!(f, "fill schema version mismatch: {found}")
            }
            Self::FieldInvalid { field } => write!(f, "fill field invalid: {field}"),
            Self::UnknownMetric { label } => write!(f, "unknown fill metric: {label}"),
            Self::MalformedNode { index, detail } => {
                write!(f, "malformed fill node {index}: {detail}")
            }
            Self::DigestMismatch { stored, recomputed } => {
                write!(
                    f,
                    "fill digest mismatch: stored={stored}, recomputed={recomputed}"
                )
            }
        }
    }
}

impl std::error::Error for FillIoError {}

fn digest_string(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

/// The fill body as a JSON object, without the digest field.
fn fill_body(fill: &Fill) -> serde_json::Map<String, Value> {
    let nodes: Vec<Value> = fill
        .nodes
        .iter()
        .map(|n| {
            let predecessor = n.predecessor.map_or(Value::Null, Value::from);
            serde_json::json!([n.x, n.y, n.z, f64::from(n.distance), predecessor, n.open])
        })
        .collect();
    let mut body = serde_json::Map::new();
    body.insert("metric".into(), Value::from(fill.metric.as_str()));
    body.insert("nodes".into(), Value::from(nodes));
    body.insert("schema_version".into(), Value::from(FILL_SCHEMA_VERSION));
    body.insert(
        "source_paths".into(),
        Value::from(fill.source_paths.clone()),
    );
    body.insert(
        "spacing".into(),
        serde_json::json!([fill.spacing.0, fill.spacing.1, fill.spacing.2]),
    );
    body.insert("threshold".into(), Value::from(f64::from(fill.threshold)));
    body.insert("unit".into(), Value::from(fill.unit.as_str()));
    body
}

/// Serialize a fill to JSON bytes, digest included.
#[must_use]
pub fn fill_to_bytes(fill: &Fill) -> Vec<u8> {
    let mut body = fill_body(fill);
    let digest = digest_string(Value::Object(body.clone()).to_string().as_bytes());
    body.insert("digest".to_string(), Value::from(digest));
    Value::Object(body).to_string().into_bytes()
}

/// Write a fill artifact file.
///
/// # Errors
///
/// Returns [`FillIoError::Io`] if the file cannot be written.
pub fn write_fill(path: &Path, fill: &Fill) -> Result<(), FillIoError> {
    std::fs::write(path, fill_to_bytes(fill)).map_err(|e| FillIoError::Io {
        detail: e.to_string(),
    })
}

fn field<'a>(object: &'a Value, name: &'static str) -> Result<&'a Value, FillIoError> {
    object.get(name).ok_or(FillIoError::FieldInvalid { field: name })
}

fn as_f64(value: &Value, name: &'static str) -> Result<f64, FillIoError> {
    value.as_f64().ok_or(FillIoError::FieldInvalid { field: name })
}

fn node_from_row(index: usize, row: &Value) -> Result<FillNode, FillIoError> {
    let malformed = |detail: &str| FillIoError::MalformedNode {
        index,
        detail: detail.to_string(),
    };
    let row = row.as_array().ok_or_else(|| malformed("not an array"))?;
    if row.len() != 6 {
        return Err(malformed("expected 6 elements"));
    }
    let coordinate = |value: &Value| -> Result<u32, FillIoError> {
        value
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| malformed("coordinate is not a u32"))
    };
    let distance = row[3]
        .as_f64()
        .filter(|d| d.is_finite())
        .ok_or_else(|| malformed("distance is not finite"))?;
    let predecessor = match &row[4] {
        Value::Null => None,
        value => Some(
            value
                .as_u64()
                .and_then(|v| usize::try_from(v).ok())
                .ok_or_else(|| malformed("predecessor is not an index"))?,
        ),
    };
    let open = row[5].as_bool().ok_or_else(|| malformed("open is not a bool"))?;
    #[allow(clippy::cast_possible_truncation)]
    Ok(FillNode {
        x: coordinate(&row[0])?,
        y: coordinate(&row[1])?,
        z: coordinate(&row[2])?,
        distance: distance as f32,
        predecessor,
        open,
    })
}

/// Parse fill bytes, verifying schema version and digest.
///
/// # Errors
///
/// See [`FillIoError`]; every malformation is rejected, nothing is repaired.
#[allow(clippy::cast_possible_truncation)]
pub fn fill_from_bytes(bytes: &[u8]) -> Result<Fill, FillIoError> {
    let parsed: Value = serde_json::from_slice(bytes).map_err(|e| FillIoError::Parse {
        detail: e.to_string(),
    })?;

    let version = field(&parsed, "schema_version")?
        .as_str()
        .ok_or(FillIoError::FieldInvalid {
            field: "schema_version",
        })?;
    if version != FILL_SCHEMA_VERSION {
        return Err(FillIoError::SchemaVersionMismatch {
            found: version.to_string(),
        });
    }

    let stored_digest = field(&parsed, "digest")?
        .as_str()
        .ok_or(FillIoError::FieldInvalid { field: "digest" })?
        .to_string();
    let mut body = match &parsed {
        Value::Object(map) => map.clone(),
        _ => {
            return Err(FillIoError::Parse {
                detail: "top level is not an object".to_string(),
            })
        }
    };
    body.remove("digest");
    let recomputed = digest_string(Value::Object(body).to_string().as_bytes());
    if recomputed != stored_digest {
        return Err(FillIoError::DigestMismatch {
            stored: stored_digest,
            recomputed,
        });
    }

    let metric_label = field(&parsed, "metric")?
        .as_str()
        .ok_or(FillIoError::FieldInvalid { field: "metric" })?;
    let metric = FillMetric::parse(metric_label).ok_or_else(|| FillIoError::UnknownMetric {
        label: metric_label.to_string(),
    })?;

    let threshold = as_f64(field(&parsed, "threshold")?, "threshold")? as f32;

    let spacing_row = field(&parsed, "spacing")?
        .as_array()
        .filter(|a| a.len() == 3)
        .ok_or(FillIoError::FieldInvalid { field: "spacing" })?;
    let spacing = (
        as_f64(&spacing_row[0], "spacing")?,
        as_f64(&spacing_row[1], "spacing")?,
        as_f64(&spacing_row[2], "spacing")?,
    );

    let unit = field(&parsed, "unit")?
        .as_str()
        .ok_or(FillIoError::FieldInvalid { field: "unit" })?
        .to_string();

    let source_paths = field(&parsed, "source_paths")?
        .as_array()
        .ok_or(FillIoError::FieldInvalid {
            field: "source_paths",
        })?
        .iter()
        .map(|v| v.as_u64().ok_or(FillIoError::FieldInvalid {
            field: "source_paths",
        }))
        .collect::<Result<Vec<u64>, FillIoError>>()?;

    let rows = field(&parsed, "nodes")?
        .as_array()
        .ok_or(FillIoError::FieldInvalid { field: "nodes" })?;
    let mut nodes = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let node = node_from_row(index, row)?;
        if let Some(pred) = node.predecessor {
            if pred >= rows.len() {
                return Err(FillIoError::MalformedNode {
                    index,
                    detail: format!("predecessor {pred} out of range"),
                });
            }
        }
        nodes.push(node);
    }

    Ok(Fill {
        nodes,
        threshold,
        metric,
        source_paths,
        spacing,
        unit,
    })
}

/// Read a fill artifact file.
///
/// # Errors
///
/// [`FillIoError::Io`] on read failure, otherwise see [`fill_from_bytes`].
pub fn read_fill(path: &Path) -> Result<Fill, FillIoError> {
    let bytes = std::fs::read(path).map_err(|e| FillIoError::Io {
        detail: e.to_string(),
    })?;
    fill_from_bytes(&bytes)
}
