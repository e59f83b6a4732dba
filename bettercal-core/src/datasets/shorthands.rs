//! Course-title shorthand dictionary.
//!
//! `shorthands.csv` is a hand-curated table of
//! `(shorthand, german title, english title)` rows. Both locale titles
//! are registered so the lookup works regardless of the feed language.

use std::collections::HashMap;
use std::io::Read;

use crate::datasets::malformed;
use crate::error::BetterCalResult;

pub(crate) fn read_shorthands<R: Read>(
    reader: R,
    path: &str,
) -> BetterCalResult<HashMap<String, String>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let mut shorthands = HashMap::new();
    for (index, record) in csv.records().enumerate() {
        let record = record.map_err(|e| malformed(path, e.to_string()))?;
        if record.len() < 3 {
            return Err(malformed(
                path,
                format!("row {}: expected 3 fields, got {}", index + 2, record.len()),
            ));
        }

        let shorthand = record[0].trim();
        for title in [&record[1], &record[2]] {
            let title = title.trim().to_lowercase();
            if title.is_empty() || title == "n/a" {
                continue;
            }
            shorthands.insert(title, shorthand.to_string());
        }
    }

    Ok(shorthands)
}
