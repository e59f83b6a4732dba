//! Course directory scraped from the TISS course-detail pages.
//!
//! `courses.csv` has a fixed 7-column header: number, name, TISS URL,
//! TUWEL URL and the three registration-window timestamps. Rows without
//! a course number are artifacts of the scrape and are skipped.

use std::collections::HashMap;
use std::io::Read;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::datasets::malformed;
use crate::error::BetterCalResult;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Course number in the `123.456` form.
    pub id: String,
    pub name: Option<String>,
    /// TISS course detail page.
    pub tiss_url: String,
    /// TUWEL (learning platform) course page.
    pub tuwel_url: Option<String>,
    pub registration_start: Option<NaiveDateTime>,
    pub registration_end: Option<NaiveDateTime>,
    pub deregistration_end: Option<NaiveDateTime>,
}

pub(crate) fn read_courses<R: Read>(
    reader: R,
    path: &str,
) -> BetterCalResult<HashMap<String, CourseRecord>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let mut courses = HashMap::new();
    for (index, record) in csv.records().enumerate() {
        let record = record.map_err(|e| malformed(path, e.to_string()))?;
        if record.len() < 7 {
            return Err(malformed(
                path,
                format!("row {}: expected 7 fields, got {}", index + 2, record.len()),
            ));
        }

        let id = record[0].trim().to_string();
        if id.is_empty() {
            continue;
        }

        let course = CourseRecord {
            id: id.clone(),
            name: non_empty(&record[1]),
            tiss_url: record[2].trim().to_string(),
            tuwel_url: non_empty(&record[3]),
            registration_start: parse_timestamp(&record[4], path)?,
            registration_end: parse_timestamp(&record[5], path)?,
            deregistration_end: parse_timestamp(&record[6], path)?,
        };
        courses.insert(id, course);
    }

    Ok(courses)
}

fn non_empty(field: &str) -> Option<String> {
    let field = field.trim();
    (!field.is_empty()).then(|| field.to_string())
}

fn parse_timestamp(field: &str, path: &str) -> BetterCalResult<Option<NaiveDateTime>> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(field, TIMESTAMP_FORMAT)
        .map(Some)
        .map_err(|e| malformed(path, format!("bad timestamp '{field}': {e}")))
}
