//! JSON bodies exchanged with the pixel backend.
//!
//! Field names follow the server exactly (`X`, `Y`, `hex-code`), so every wire
//! struct renames explicitly instead of relying on a case convention.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    domain::{Cell, CellCoord, HexColor, ScoreEntry, Scoreboard},
    error::{CellDecodeError, PayloadError},
};

pub const GET_PIXEL_PATH: &str = "/api/get_pixel";
pub const GET_USER_DETAILS_PATH: &str = "/api/get_user_details";
pub const UPDATE_PIXEL_PATH: &str = "/api/update_pixel";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixelRecord {
    #[serde(rename = "X")]
    pub x: i64,
    #[serde(rename = "Y")]
    pub y: i64,
    #[serde(rename = "hex-code")]
    pub hex_code: String,
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl PixelRecord {
    pub fn into_cell(self) -> Result<Cell, CellDecodeError> {
        let coord = CellCoord::new(self.x, self.y)?;
        let color: HexColor = self.hex_code.parse()?;
        if self.user.trim().is_empty() {
            return Err(CellDecodeError::MissingOwner {
                x: self.x,
                y: self.y,
            });
        }
        let updated_at = self.updated_at.as_deref().and_then(parse_timestamp);
        Ok(Cell {
            coord,
            color,
            owner: self.user,
            updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPixelResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixels: Option<Vec<PixelRecord>>,
}

impl GetPixelResponse {
    /// Converts the body into board cells. Records that cannot form a valid
    /// cell are dropped with a warning; a body without `pixels` is an error.
    pub fn into_cells(self) -> Result<Vec<Cell>, PayloadError> {
        if !self.success {
            return Err(PayloadError::Rejected);
        }
        let records = self.pixels.ok_or(PayloadError::MissingField("pixels"))?;
        let mut cells = Vec::with_capacity(records.len());
        for record in records {
            match record.into_cell() {
                Ok(cell) => cells.push(cell),
                Err(err) => warn!(%err, "skipping undecodable pixel record"),
            }
        }
        Ok(cells)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetailsResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<Vec<ScoreEntry>>,
}

impl UserDetailsResponse {
    pub fn into_scoreboard(self) -> Result<Scoreboard, PayloadError> {
        if !self.success {
            return Err(PayloadError::Rejected);
        }
        let entries = self
            .user_data
            .ok_or(PayloadError::MissingField("user_data"))?;
        Ok(Scoreboard::from_entries(entries))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelUpdate {
    #[serde(rename = "X")]
    pub x: u16,
    #[serde(rename = "Y")]
    pub y: u16,
    #[serde(rename = "hex-code")]
    pub hex_code: HexColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePixelRequest {
    pub user: String,
    pub pixel_list: Vec<PixelUpdate>,
}

impl UpdatePixelRequest {
    pub fn single(user: impl Into<String>, coord: CellCoord, color: HexColor) -> Self {
        Self {
            user: user.into(),
            pixel_list: vec![PixelUpdate {
                x: coord.x(),
                y: coord.y(),
                hex_code: color,
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePixelResponse {
    pub message: String,
}

/// Accepts RFC 3339, the RFC 2822 form Flask emits for datetimes, and a bare
/// `YYYY-MM-DD HH:MM:SS[.f]` interpreted as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    debug!(raw, "unrecognized pixel timestamp");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_pixel_payload_with_server_field_names() {
        let body: GetPixelResponse = serde_json::from_value(json!({
            "success": true,
            "pixels": [
                {"X": 20, "Y": 20, "hex-code": "#ff0000", "user": "ada", "updated_at": "2024-03-01T10:00:00Z"},
                {"X": 3, "Y": 7, "hex-code": "00FF00", "user": "bob", "updated_at": "Fri, 01 Mar 2024 10:00:00 GMT"}
            ]
        }))
        .expect("decode");

        let cells = body.into_cells().expect("cells");
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].coord, CellCoord::new(20, 20).expect("coord"));
        assert_eq!(cells[0].color.to_string(), "#ff0000");
        assert_eq!(cells[0].owner, "ada");
        assert!(cells[0].updated_at.is_some());
        assert_eq!(cells[1].color, HexColor::from_rgb(0, 255, 0));
        assert_eq!(cells[1].updated_at, cells[0].updated_at);
    }

    #[test]
    fn drops_records_that_cannot_be_cells() {
        let body: GetPixelResponse = serde_json::from_value(json!({
            "success": true,
            "pixels": [
                {"X": 150, "Y": 0, "hex-code": "#000000", "user": "edge"},
                {"X": 1, "Y": 1, "hex-code": "red", "user": "named"},
                {"X": 2, "Y": 2, "hex-code": "#123456", "user": "  "},
                {"X": 149, "Y": 79, "hex-code": "#abcdef", "user": "corner", "updated_at": null}
            ]
        }))
        .expect("decode");

        let cells = body.into_cells().expect("cells");
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].owner, "corner");
        assert_eq!(cells[0].updated_at, None);
    }

    #[test]
    fn missing_fields_fail_the_whole_payload() {
        let missing_color = serde_json::from_value::<GetPixelResponse>(json!({
            "success": true,
            "pixels": [{"X": 1, "Y": 1, "user": "ada"}]
        }));
        assert!(missing_color.is_err());

        let missing_list: GetPixelResponse =
            serde_json::from_value(json!({"success": true})).expect("decode");
        assert_eq!(
            missing_list.into_cells(),
            Err(PayloadError::MissingField("pixels"))
        );

        let rejected: UserDetailsResponse =
            serde_json::from_value(json!({"success": false})).expect("decode");
        assert_eq!(rejected.into_scoreboard(), Err(PayloadError::Rejected));
    }

    #[test]
    fn scoreboard_is_sorted_by_score_descending() {
        let body: UserDetailsResponse = serde_json::from_value(json!({
            "success": true,
            "user_data": [
                {"user": "low", "score": 1},
                {"user": "high", "score": 9},
                {"user": "tie-a", "score": 4},
                {"user": "tie-b", "score": 4}
            ]
        }))
        .expect("decode");

        let board = body.into_scoreboard().expect("scoreboard");
        let users: Vec<&str> = board.entries().iter().map(|e| e.user.as_str()).collect();
        assert_eq!(users, ["high", "tie-a", "tie-b", "low"]);
    }

    #[test]
    fn update_request_uses_server_field_names() {
        let request = UpdatePixelRequest::single(
            "ada",
            CellCoord::new(20, 20).expect("coord"),
            "#FF0000".parse().expect("color"),
        );
        assert_eq!(
            serde_json::to_value(&request).expect("encode"),
            json!({"user": "ada", "pixel_list": [{"X": 20, "Y": 20, "hex-code": "#ff0000"}]})
        );
    }

    #[test]
    fn parses_naive_server_timestamps_as_utc() {
        let parsed = parse_timestamp("2024-03-01 10:00:00.250").expect("timestamp");
        assert_eq!(parsed.to_rfc3339(), "2024-03-01T10:00:00.250+00:00");
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
