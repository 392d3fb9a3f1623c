use crate::error::AlignError;
use crate::models::VoteTable;
use crate::normalize;
use chrono::{NaiveDate, NaiveDateTime};
use log::{info, warn};
use std::collections::HashSet;
use std::io;
use std::path::Path;

/// How the raw table is interpreted. The defaults match the UN roll-call
/// dataset layout: a `Date` column inside 11 leading metadata columns, with
/// every later column holding one entity's votes. The metadata/entity split
/// is positional and validated here rather than assumed per call.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub date_column: String,
    pub metadata_columns: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            date_column: "Date".to_string(),
            metadata_columns: 11,
        }
    }
}

/// Parse a temporal cell or CLI argument. Dates load at midnight so window
/// arithmetic stays exact at daily granularity.
pub fn parse_when(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(when) = NaiveDateTime::parse_from_str(value, format) {
            return Some(when);
        }
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

pub fn load_csv_path(path: &Path, options: &LoadOptions) -> Result<VoteTable, AlignError> {
    let reader = csv::Reader::from_path(path)?;
    load_table(reader, options)
}

/// Build a `VoteTable` from raw CSV. Rows whose date cell does not parse are
/// dropped (counted and logged, never fatal); a structurally unreadable file
/// propagates as an error immediately.
pub fn load_table<R: io::Read>(
    mut reader: csv::Reader<R>,
    options: &LoadOptions,
) -> Result<VoteTable, AlignError> {
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let required = options.metadata_columns + 1;
    if headers.len() < required {
        return Err(AlignError::TooFewColumns {
            found: headers.len(),
            required,
        });
    }

    let date_index = headers
        .iter()
        .position(|header| *header == options.date_column)
        .ok_or_else(|| AlignError::MissingDateColumn(options.date_column.clone()))?;

    // Everything after the metadata columns is an entity column. Canonical
    // names fold aliases together; the first column with a given name wins.
    let mut seen = HashSet::new();
    let mut entity_columns = Vec::new();
    let mut entity_names = Vec::new();
    for (index, header) in headers.iter().enumerate().skip(options.metadata_columns) {
        let name = normalize::canonical_name(header);
        if seen.insert(name.to_string()) {
            entity_columns.push(index);
            entity_names.push(name.to_string());
        } else {
            warn!("dropping duplicate entity column '{}' (canonical '{}')", header, name);
        }
    }

    let mut table = VoteTable::new(entity_names);
    let mut dropped = 0usize;

    for result in reader.records() {
        let record = result?;
        let date = match record.get(date_index).and_then(parse_when) {
            Some(date) => date,
            None => {
                dropped += 1;
                continue;
            }
        };

        let votes: Vec<Option<&str>> = entity_columns
            .iter()
            .map(|&index| {
                let cell = record.get(index).map(str::trim).unwrap_or("");
                if cell.is_empty() { None } else { Some(cell) }
            })
            .collect();
        table.push_record(date, &votes);
    }

    if dropped > 0 {
        warn!("dropped {} rows with unparseable dates", dropped);
    }
    info!(
        "loaded {} resolutions across {} entities",
        table.len(),
        table.entities().len()
    );
    Ok(table)
}
