//! Room directory: display name → address, floor, room code, schedule URL.
//!
//! `rooms.csv` mirrors the TISS room-selection table: nine fields per
//! row, no header. Field 6 is a compound address like
//! `"Gußhausstraße 25-29, Stiege 1, 3. Stock"`; the first comma
//! segment is the street address, and later segments may describe the
//! floor in German. When no segment does, the floor can still be
//! decoded from the positional room code (see [`decode_floor_code`]).

use std::collections::HashMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::datasets::malformed;
use crate::error::BetterCalResult;
use crate::event::BilingualText;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    /// Street address of the building.
    pub address: String,
    /// Floor text found in the compound address, if any.
    pub floor: Option<BilingualText>,
    /// Positional room code, e.g. `CDEG18`.
    pub room_code: String,
    /// TISS room reservation schedule.
    pub schedule_url: String,
}

pub(crate) fn read_rooms<R: Read>(
    reader: R,
    path: &str,
) -> BetterCalResult<HashMap<String, RoomRecord>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rooms = HashMap::new();
    for (index, record) in csv.records().enumerate() {
        let record = record.map_err(|e| malformed(path, e.to_string()))?;
        if record.len() < 9 {
            return Err(malformed(
                path,
                format!("row {}: expected 9 fields, got {}", index + 1, record.len()),
            ));
        }

        let name = record[0].trim().to_string();
        let mut segments = record[6].split(',').map(str::trim);
        let address = segments.next().unwrap_or("").to_string();
        let floor = segments.find_map(classify_floor);

        rooms.insert(
            name,
            RoomRecord {
                address,
                floor,
                room_code: record[7].trim().to_string(),
                schedule_url: record[8].trim().to_string(),
            },
        );
    }

    Ok(rooms)
}

const FLOOR_KEYWORDS: &[&str] = &[
    "stock",
    "geschoss",
    "geschoß",
    "parterre",
    "keller",
    "souterrain",
];

/// Classify one address segment as floor text, if it is one.
fn classify_floor(segment: &str) -> Option<BilingualText> {
    let lower = segment.to_lowercase();
    if !FLOOR_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        return None;
    }

    if lower.contains("erdgescho") {
        return Some(ground_floor());
    }
    if lower.contains("dachgescho") {
        return Some(roof_floor());
    }
    if let Some(n) = leading_number(&lower) {
        if lower.contains("untergescho") || lower.contains("keller") {
            return Some(underground_floor(n));
        }
        if lower.contains("stock") || lower.contains("obergescho") {
            return Some(upper_floor(n));
        }
    }

    // Floor-ish text we cannot classify is shown verbatim in both locales.
    Some(BilingualText::same(segment))
}

/// Decode the floor from a positional room code, e.g. `CDEG18`.
///
/// Characters [2..4) carry the floor: a number is an upper floor, `EG`
/// the ground floor, `DG` the roof floor, `U` plus a digit an
/// underground floor. Anything else passes through unlocalized.
pub fn decode_floor_code(code: &str) -> Option<BilingualText> {
    let segment = code.get(2..4)?;

    if let Ok(n) = segment.parse::<u32>() {
        return Some(upper_floor(n));
    }
    if segment.eq_ignore_ascii_case("EG") {
        return Some(ground_floor());
    }
    if segment.eq_ignore_ascii_case("DG") {
        return Some(roof_floor());
    }
    let mut chars = segment.chars();
    if let (Some('U'), Some(digit)) = (chars.next(), chars.next()) {
        if let Some(n) = digit.to_digit(10) {
            return Some(underground_floor(n));
        }
    }

    Some(BilingualText::same(segment))
}

fn ground_floor() -> BilingualText {
    BilingualText::new("Erdgeschoss", "ground floor")
}

fn roof_floor() -> BilingualText {
    BilingualText::new("Dachgeschoss", "roof floor")
}

fn upper_floor(n: u32) -> BilingualText {
    BilingualText::new(format!("{n}. Stock"), format!("{} floor", ordinal(n)))
}

fn underground_floor(n: u32) -> BilingualText {
    BilingualText::new(
        format!("{n}. Untergeschoss"),
        format!("{} underground floor", ordinal(n)),
    )
}

fn leading_number(text: &str) -> Option<u32> {
    let digits: String = text.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (1, hundreds) if hundreds != 11 => "st",
        (2, hundreds) if hundreds != 12 => "nd",
        (3, hundreds) if hundreds != 13 => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_named_floors() {
        assert_eq!(classify_floor("Erdgeschoß").unwrap().en, "ground floor");
        assert_eq!(classify_floor("Dachgeschoss").unwrap().de, "Dachgeschoss");
        assert_eq!(classify_floor("3. Stock").unwrap().en, "3rd floor");
        assert_eq!(classify_floor("1. Untergeschoss").unwrap().de, "1. Untergeschoss");
    }

    #[test]
    fn non_floor_segments_are_ignored() {
        assert_eq!(classify_floor("Stiege 1"), None);
        assert_eq!(classify_floor("Gußhausstraße 25-29"), None);
    }

    #[test]
    fn unclassifiable_floor_text_passes_through() {
        let floor = classify_floor("Zwischengeschoss").unwrap();
        assert_eq!(floor.de, "Zwischengeschoss");
        assert_eq!(floor.en, "Zwischengeschoss");
    }

    #[test]
    fn decodes_room_code_floors() {
        assert_eq!(decode_floor_code("CDEG18").unwrap().en, "ground floor");
        assert_eq!(decode_floor_code("AADG05").unwrap().de, "Dachgeschoss");
        assert_eq!(decode_floor_code("DA0527").unwrap().en, "5th floor");
        assert_eq!(decode_floor_code("DBU105").unwrap().en, "1st underground floor");
        assert_eq!(decode_floor_code("ABXY01").unwrap().de, "XY");
        assert_eq!(decode_floor_code("AB"), None);
    }

    #[test]
    fn english_ordinals() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(21), "21st");
    }
}
