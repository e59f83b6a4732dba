//! LectureTube availability: the set of room codes with a live stream.
//!
//! `lecturetube_availability.csv` is a headerless single-column list of
//! room codes, sorted by the generator.

use std::collections::HashSet;
use std::io::Read;

use crate::datasets::malformed;
use crate::error::BetterCalResult;

pub(crate) fn read_lecturetube<R: Read>(
    reader: R,
    path: &str,
) -> BetterCalResult<HashSet<String>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut codes = HashSet::new();
    for record in csv.records() {
        let record = record.map_err(|e| malformed(path, e.to_string()))?;
        let code = record.get(0).unwrap_or("").trim();
        if !code.is_empty() {
            codes.insert(code.to_string());
        }
    }

    Ok(codes)
}

/// Player page for a streaming-capable room.
pub fn player_url(room_code: &str) -> String {
    format!("https://live.video.tuwien.ac.at/room/{room_code}/player.html")
}
