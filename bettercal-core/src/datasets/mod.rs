//! Static lookup datasets consulted during enrichment.
//!
//! All four resources are loaded once at startup into a [`Datasets`]
//! value that is shared read-only for the lifetime of the process. A
//! missing or malformed resource is a deployment error and aborts
//! startup; a process restart is the only refresh mechanism.

mod courses;
mod lecturetube;
mod rooms;
mod shorthands;

pub use courses::CourseRecord;
pub use lecturetube::player_url;
pub use rooms::{decode_floor_code, RoomRecord};

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::error::{BetterCalError, BetterCalResult};

/// The three lookup tables plus the LectureTube availability set.
#[derive(Debug, Clone)]
pub struct Datasets {
    shorthands: HashMap<String, String>,
    rooms: HashMap<String, RoomRecord>,
    courses: HashMap<String, CourseRecord>,
    lecturetube: HashSet<String>,
}

impl Datasets {
    /// Load all resources from a directory containing `shorthands.csv`,
    /// `rooms.csv`, `courses.csv` and `lecturetube_availability.csv`.
    pub fn load(dir: &Path) -> BetterCalResult<Self> {
        let datasets = Self::from_readers(
            open(dir, "shorthands.csv")?,
            open(dir, "rooms.csv")?,
            open(dir, "courses.csv")?,
            open(dir, "lecturetube_availability.csv")?,
        )?;
        info!(
            shorthands = datasets.shorthands.len(),
            rooms = datasets.rooms.len(),
            courses = datasets.courses.len(),
            lecturetube = datasets.lecturetube.len(),
            "loaded lookup datasets"
        );
        Ok(datasets)
    }

    /// Build the tables from raw readers. Tests feed in-memory strings.
    pub fn from_readers<R: Read>(
        shorthands: R,
        rooms: R,
        courses: R,
        lecturetube: R,
    ) -> BetterCalResult<Self> {
        Ok(Self {
            shorthands: shorthands::read_shorthands(shorthands, "shorthands.csv")?,
            rooms: rooms::read_rooms(rooms, "rooms.csv")?,
            courses: courses::read_courses(courses, "courses.csv")?,
            lecturetube: lecturetube::read_lecturetube(lecturetube, "lecturetube_availability.csv")?,
        })
    }

    /// Look up the shorthand for a course title, case-insensitively.
    pub fn shorthand(&self, title: &str) -> Option<&str> {
        self.shorthands.get(&title.to_lowercase()).map(String::as_str)
    }

    pub fn room(&self, name: &str) -> Option<&RoomRecord> {
        self.rooms.get(name)
    }

    pub fn course(&self, number: &str) -> Option<&CourseRecord> {
        self.courses.get(number)
    }

    /// Whether the room with this code streams on LectureTube.
    pub fn has_lecturetube(&self, room_code: &str) -> bool {
        self.lecturetube.contains(room_code)
    }
}

fn open(dir: &Path, name: &str) -> BetterCalResult<File> {
    let path = dir.join(name);
    File::open(&path).map_err(|source| BetterCalError::DatasetIo {
        path: path.display().to_string(),
        source,
    })
}

/// Shared constructor for malformed-row errors.
pub(crate) fn malformed(path: &str, reason: impl Into<String>) -> BetterCalError {
    BetterCalError::DatasetFormat {
        path: path.to_string(),
        reason: reason.into(),
    }
}
