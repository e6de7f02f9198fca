//! Core domain types shared across the gaiteval crates
//!
//! These are the boundary types for the two external collaborators the
//! engine talks to: the session listing API and the result-set storage.
//! Payloads are validated here, at the boundary, before anything enters
//! the evaluation engine.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// One of the up-to-four physical recording perspectives of a session.
///
/// A camera filming a runner moving left-to-right sees the runner's right
/// side most clearly, and vice versa; the value resolver exploits this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraAngle {
    /// Primary side-on recording; required for a session to complete
    Normal,
    /// Runner crosses the frame left to right (right side facing camera)
    LeftToRight,
    /// Runner crosses the frame right to left (left side facing camera)
    RightToLeft,
    /// Recording from behind the runner
    RearView,
}

impl CameraAngle {
    /// Stable wire/file name for this angle
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraAngle::Normal => "normal",
            CameraAngle::LeftToRight => "left_to_right",
            CameraAngle::RightToLeft => "right_to_left",
            CameraAngle::RearView => "rear_view",
        }
    }

    /// All angles, in the order the collaborators report them
    pub fn all() -> [CameraAngle; 4] {
        [
            CameraAngle::Normal,
            CameraAngle::LeftToRight,
            CameraAngle::RightToLeft,
            CameraAngle::RearView,
        ]
    }
}

impl fmt::Display for CameraAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CameraAngle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normal" => Ok(CameraAngle::Normal),
            "left_to_right" => Ok(CameraAngle::LeftToRight),
            "right_to_left" => Ok(CameraAngle::RightToLeft),
            "rear_view" => Ok(CameraAngle::RearView),
            other => Err(Error::InvalidInput(format!("unknown camera angle: {other}"))),
        }
    }
}

/// Anatomical side of a bilateral metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Metric key suffix for this side (`-l` / `-r`)
    pub fn suffix(&self) -> &'static str {
        match self {
            Side::Left => "-l",
            Side::Right => "-r",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Processing state of an analysis session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Processing,
    /// Primary angle processed successfully; session participates in
    /// classification and aggregation
    Completed,
    /// Terminal; no result sets usable
    Failed,
}

/// One session entry as reported by the session listing collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListing {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub status: SessionStatus,
    /// Angles whose recordings were uploaded and processed. Angles not
    /// listed here are treated as having no result set.
    #[serde(default)]
    pub uploaded_angles: Vec<CameraAngle>,
}

impl SessionListing {
    pub fn has_angle(&self, angle: CameraAngle) -> bool {
        self.uploaded_angles.contains(&angle)
    }
}

/// Parsed numeric output of one (session, camera angle) recording.
///
/// Immutable once created; a reprocessed recording supersedes the whole
/// result set rather than updating it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSet {
    pub session_id: Uuid,
    pub angle: CameraAngle,
    /// Metric key to measured value. Metrics the angle did not measure
    /// are absent, never zero.
    pub values: HashMap<String, f64>,
}

impl ResultSet {
    /// Parse the collaborator's tabular text: one header row of metric
    /// keys, one data row of numeric values. Empty cells mean "not
    /// measured" and are omitted from the map.
    pub fn parse(session_id: Uuid, angle: CameraAngle, text: &str) -> Result<Self> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| Error::MalformedResultSet("empty result set".into()))?;
        let data = lines
            .next()
            .ok_or_else(|| Error::MalformedResultSet("missing data row".into()))?;

        let keys: Vec<&str> = header.split(',').map(str::trim).collect();
        let values = parse_row(&keys, data)?;

        Ok(ResultSet {
            session_id,
            angle,
            values,
        })
    }

    /// Value for a metric key, if this angle measured it
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

/// Frame-by-frame variant of a result set: one row per video frame.
///
/// Used only for single-session intra-stride charts, never for
/// cross-session trends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSeries {
    pub session_id: Uuid,
    pub angle: CameraAngle,
    pub keys: Vec<String>,
    /// One entry per frame, in recording order
    pub frames: Vec<HashMap<String, f64>>,
}

impl FrameSeries {
    /// Parse the frame-by-frame tabular variant: header row of metric
    /// keys, then one row per frame.
    pub fn parse(session_id: Uuid, angle: CameraAngle, text: &str) -> Result<Self> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| Error::MalformedResultSet("empty frame series".into()))?;
        let keys: Vec<&str> = header.split(',').map(str::trim).collect();

        let mut frames = Vec::new();
        for line in lines {
            frames.push(parse_row(&keys, line)?);
        }

        Ok(FrameSeries {
            session_id,
            angle,
            keys: keys.into_iter().map(String::from).collect(),
            frames,
        })
    }

    /// Per-frame series for one metric; `None` for frames where the
    /// metric was not measured
    pub fn series(&self, key: &str) -> Vec<Option<f64>> {
        self.frames.iter().map(|f| f.get(key).copied()).collect()
    }
}

fn parse_row(keys: &[&str], line: &str) -> Result<HashMap<String, f64>> {
    let cells: Vec<&str> = line.split(',').map(str::trim).collect();
    if cells.len() > keys.len() {
        return Err(Error::MalformedResultSet(format!(
            "data row has {} cells but header has {} keys",
            cells.len(),
            keys.len()
        )));
    }

    let mut values = HashMap::new();
    for (key, cell) in keys.iter().zip(cells.iter()) {
        if cell.is_empty() {
            continue; // not measured for this angle
        }
        let value: f64 = cell.parse().map_err(|_| {
            Error::MalformedResultSet(format!("non-numeric value {cell:?} for metric {key:?}"))
        })?;
        values.insert((*key).to_string(), value);
    }
    Ok(values)
}

/// A completed session together with whatever result sets were fetched
/// for it. Locally owned by one request; never shared or cached.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    pub listing: SessionListing,
    pub result_sets: HashMap<CameraAngle, ResultSet>,
}

impl AnalysisSession {
    pub fn new(listing: SessionListing) -> Self {
        Self {
            listing,
            result_sets: HashMap::new(),
        }
    }

    pub fn result_set(&self, angle: CameraAngle) -> Option<&ResultSet> {
        self.result_sets.get(&angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid() -> Uuid {
        Uuid::nil()
    }

    #[test]
    fn parse_result_set_basic() {
        let text = "step_rate,fat-l,fat-r\n172.5,8.0,9.5\n";
        let rs = ResultSet::parse(sid(), CameraAngle::Normal, text).unwrap();
        assert_eq!(rs.get("step_rate"), Some(172.5));
        assert_eq!(rs.get("fat-l"), Some(8.0));
        assert_eq!(rs.get("fat-r"), Some(9.5));
    }

    #[test]
    fn parse_result_set_empty_cells_are_unmeasured() {
        let text = "step_rate,fat-l,fat-r\n172.5,,9.5\n";
        let rs = ResultSet::parse(sid(), CameraAngle::Normal, text).unwrap();
        assert_eq!(rs.get("fat-l"), None);
        assert_eq!(rs.get("fat-r"), Some(9.5));
    }

    #[test]
    fn parse_result_set_short_data_row() {
        // Trailing absent cells also mean "not measured"
        let text = "step_rate,fat-l,fat-r\n172.5\n";
        let rs = ResultSet::parse(sid(), CameraAngle::Normal, text).unwrap();
        assert_eq!(rs.get("step_rate"), Some(172.5));
        assert_eq!(rs.get("fat-r"), None);
    }

    #[test]
    fn parse_result_set_missing_data_row() {
        let err = ResultSet::parse(sid(), CameraAngle::Normal, "step_rate\n").unwrap_err();
        assert!(matches!(err, Error::MalformedResultSet(_)));
    }

    #[test]
    fn parse_result_set_non_numeric_cell() {
        let text = "step_rate,fat-l\n172.5,oops\n";
        let err = ResultSet::parse(sid(), CameraAngle::Normal, text).unwrap_err();
        assert!(matches!(err, Error::MalformedResultSet(_)));
    }

    #[test]
    fn parse_frame_series() {
        let text = "knee_flexion_stance-l,knee_flexion_stance-r\n41.0,40.5\n42.2,\n43.1,41.9\n";
        let fs = FrameSeries::parse(sid(), CameraAngle::Normal, text).unwrap();
        assert_eq!(fs.frames.len(), 3);
        assert_eq!(
            fs.series("knee_flexion_stance-r"),
            vec![Some(40.5), None, Some(41.9)]
        );
    }

    #[test]
    fn camera_angle_round_trip() {
        for angle in CameraAngle::all() {
            assert_eq!(angle.as_str().parse::<CameraAngle>().unwrap(), angle);
        }
    }

    #[test]
    fn side_suffixes() {
        assert_eq!(Side::Left.suffix(), "-l");
        assert_eq!(Side::Right.suffix(), "-r");
    }
}
