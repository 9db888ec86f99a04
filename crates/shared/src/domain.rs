use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CellDecodeError;

/// Number of columns on the shared board.
pub const GRID_COLS: u16 = 150;
/// Number of rows on the shared board.
pub const GRID_ROWS: u16 = 80;

/// A board coordinate that is always inside `[0, GRID_COLS) x [0, GRID_ROWS)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    x: u16,
    y: u16,
}

impl CellCoord {
    pub fn new(x: i64, y: i64) -> Result<Self, CellDecodeError> {
        if !(0..i64::from(GRID_COLS)).contains(&x) || !(0..i64::from(GRID_ROWS)).contains(&y) {
            return Err(CellDecodeError::OutOfBounds { x, y });
        }
        Ok(Self {
            x: x as u16,
            y: y as u16,
        })
    }

    /// Every board coordinate in row-major order.
    pub fn all() -> impl Iterator<Item = CellCoord> {
        (0..GRID_ROWS).flat_map(|y| (0..GRID_COLS).map(move |x| CellCoord { x, y }))
    }

    pub fn x(self) -> u16 {
        self.x
    }

    pub fn y(self) -> u16 {
        self.y
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// 24-bit RGB color carried on the wire as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor([u8; 3]);

impl HexColor {
    pub const WHITE: HexColor = HexColor([0xff, 0xff, 0xff]);
    pub const BLACK: HexColor = HexColor([0x00, 0x00, 0x00]);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn rgb(self) -> [u8; 3] {
        self.0
    }
}

impl FromStr for HexColor {
    type Err = CellDecodeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let digits = raw.trim().strip_prefix('#').unwrap_or(raw.trim());
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CellDecodeError::InvalidColor(raw.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| CellDecodeError::InvalidColor(raw.to_string()))
        };
        Ok(Self([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One painted board cell as last reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub coord: CellCoord,
    pub color: HexColor,
    pub owner: String,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub user: String,
    pub score: i64,
}

/// Per-user pixel counts, highest score first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    entries: Vec<ScoreEntry>,
}

impl Scoreboard {
    pub fn from_entries(mut entries: Vec<ScoreEntry>) -> Self {
        // stable: equal scores keep server order
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Self { entries }
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
