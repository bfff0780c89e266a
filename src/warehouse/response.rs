//! Wire model of the warehouse's synchronous query endpoint and its
//! conversion into a Polars `DataFrame`.
//!
//! The endpoint replies with a JSON envelope: a `schema` describing the
//! columns and a `rows` array in which every cell value arrives as a string
//! (or `null`). Timestamps come as fractional epoch seconds, datetimes as
//! ISO text without an offset. Decoding maps each schema field to a typed
//! Polars column, so a zero-row reply still yields a frame with the full
//! column set.

use crate::warehouse::error::WarehouseError;
use chrono::NaiveDateTime;
use log::warn;
use polars::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryReply {
    #[serde(default)]
    pub job_complete: Option<bool>,
    pub schema: Option<ReplySchema>,
    #[serde(default)]
    pub rows: Vec<ReplyRow>,
    #[serde(default)]
    pub total_rows: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplySchema {
    pub fields: Vec<ReplyField>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplyField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplyRow {
    #[serde(default)]
    pub f: Vec<ReplyCell>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplyCell {
    #[serde(default)]
    pub v: Value,
}

/// Error body the warehouse sends alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorReply {
    pub error: ErrorStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorStatus {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Converts a completed query reply into a typed `DataFrame`.
pub(crate) fn dataframe_from_reply(reply: QueryReply) -> Result<DataFrame, WarehouseError> {
    if reply.job_complete == Some(false) {
        return Err(WarehouseError::JobIncomplete);
    }
    let schema = reply.schema.ok_or(WarehouseError::MissingSchema)?;
    let expected = schema.fields.len();

    for (row_idx, row) in reply.rows.iter().enumerate() {
        if row.f.len() != expected {
            return Err(WarehouseError::RowShape {
                row: row_idx,
                expected,
                found: row.f.len(),
            });
        }
    }

    let mut columns = Vec::with_capacity(expected);
    for (col_idx, field) in schema.fields.iter().enumerate() {
        columns.push(decode_column(field, &reply.rows, col_idx)?);
    }
    Ok(DataFrame::new(columns)?)
}

fn decode_column(
    field: &ReplyField,
    rows: &[ReplyRow],
    col_idx: usize,
) -> Result<Column, WarehouseError> {
    let name = field.name.as_str();
    let series = match field.field_type.as_str() {
        // Fractional epoch seconds, e.g. "1.7201592E9" or "1720159200.0".
        "TIMESTAMP" => {
            let micros = decode_cells(rows, col_idx, name, "timestamp", parse_epoch_micros)?;
            Series::new(name.into(), micros)
                .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?
        }
        // Zone-less ISO text, e.g. "2024-07-05T19:00:00".
        "DATETIME" => {
            let micros = decode_cells(rows, col_idx, name, "datetime", parse_datetime_micros)?;
            Series::new(name.into(), micros)
                .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?
        }
        "FLOAT" | "FLOAT64" | "NUMERIC" | "BIGNUMERIC" => {
            let values = decode_cells(rows, col_idx, name, "float", |text| {
                text.parse::<f64>().ok()
            })?;
            Series::new(name.into(), values)
        }
        "INTEGER" | "INT64" => {
            let values = decode_cells(rows, col_idx, name, "integer", |text| {
                text.parse::<i64>().ok()
            })?;
            Series::new(name.into(), values)
        }
        "BOOLEAN" | "BOOL" => {
            let values = decode_cells(rows, col_idx, name, "boolean", |text| {
                text.parse::<bool>().ok()
            })?;
            Series::new(name.into(), values)
        }
        other => {
            if other != "STRING" {
                warn!(
                    "Column '{}' has unmapped warehouse type {}; keeping cell text",
                    name, other
                );
            }
            let values: Vec<Option<String>> = rows
                .iter()
                .map(|row| cell_text(&row.f[col_idx]).map(Cow::into_owned))
                .collect();
            Series::new(name.into(), values)
        }
    };
    Ok(series.into_column())
}

/// Extracts column `col_idx` across all rows, parsing each non-null cell.
fn decode_cells<T>(
    rows: &[ReplyRow],
    col_idx: usize,
    column: &str,
    kind: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<Option<T>>, WarehouseError> {
    let mut values = Vec::with_capacity(rows.len());
    for (row_idx, row) in rows.iter().enumerate() {
        match cell_text(&row.f[col_idx]) {
            None => values.push(None),
            Some(text) => match parse(&text) {
                Some(value) => values.push(Some(value)),
                None => {
                    return Err(WarehouseError::CellParse {
                        kind,
                        column: column.to_string(),
                        row: row_idx,
                        value: text.into_owned(),
                    });
                }
            },
        }
    }
    Ok(values)
}

fn cell_text(cell: &ReplyCell) -> Option<Cow<'_, str>> {
    match &cell.v {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

fn parse_epoch_micros(text: &str) -> Option<i64> {
    let seconds: f64 = text.parse().ok()?;
    Some((seconds * 1_000_000.0).round() as i64)
}

fn parse_datetime_micros(text: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc().timestamp_micros())
}
