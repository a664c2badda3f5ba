//! Permissive wire decoding for repository pages.
//!
//! Required fields (`id`, `private`, `fork`) fail the whole page when missing
//! or wrongly typed; optional fields (`owner`, `full_name`, `description`)
//! degrade to absent values so one malformed nested object cannot sink an
//! otherwise valid record.

use repofeed_core::{RepoOwner, Repository};
use serde_json::Value;

use crate::error::DecodeError;

/// Decode a raw page payload into an ordered sequence of repositories.
///
/// # Errors
///
/// Fails when the payload is not valid JSON, the top level is not an array,
/// or a record lacks a usable required field.
pub fn decode_repositories(bytes: &[u8]) -> Result<Vec<Repository>, DecodeError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|source| DecodeError::Json { source })?;
    let Value::Array(items) = value else {
        return Err(DecodeError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| decode_record(index, &item))
        .collect()
}

fn decode_record(index: usize, value: &Value) -> Result<Repository, DecodeError> {
    let record = value
        .as_object()
        .ok_or(DecodeError::RecordShape { index })?;

    let id = record
        .get("id")
        .and_then(Value::as_u64)
        .ok_or(DecodeError::RequiredField { index, field: "id" })?;
    let private = record.get("private").and_then(Value::as_bool).ok_or(
        DecodeError::RequiredField {
            index,
            field: "private",
        },
    )?;
    let fork =
        record
            .get("fork")
            .and_then(Value::as_bool)
            .ok_or(DecodeError::RequiredField {
                index,
                field: "fork",
            })?;

    let owner = record
        .get("owner")
        .and_then(|raw| serde_json::from_value::<RepoOwner>(raw.clone()).ok());
    let name = record
        .get("full_name")
        .and_then(Value::as_str)
        .map(ToString::to_string);
    let description = record
        .get("description")
        .and_then(Value::as_str)
        .map(ToString::to_string);

    Ok(Repository {
        id,
        owner,
        name,
        description,
        private,
        fork,
    })
}
