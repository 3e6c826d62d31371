//! JSON-lines landmark replay
//!
//! One frame per line:
//!
//! ```json
//! {"sequence": 7, "timestamp_ns": 233000000, "width": 640, "height": 480,
//!  "faces": [{"mesh": [[0.41, 0.38], [0.42, 0.37], ...]}]}
//! ```
//!
//! A face is either a normalized face mesh (`mesh`) or the named subsets
//! `left_eye` / `right_eye` / `mouth` in pixel coordinates. Blank lines are
//! skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Stdin};
use std::path::Path;

use face_geometry::{FaceLandmarks, MeshLandmarks, NamedLandmarks};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{CameraError, FrameSource, LandmarkFrame};

#[derive(Debug, Deserialize)]
struct FrameRecord {
    sequence: u64,
    #[serde(default)]
    timestamp_ns: u64,
    width: u32,
    height: u32,
    #[serde(default)]
    faces: Vec<FaceRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FaceRecord {
    Mesh { mesh: Vec<[f64; 2]> },
    Named(NamedLandmarks),
}

impl FrameRecord {
    fn into_frame(self) -> LandmarkFrame {
        let (width, height) = (self.width, self.height);
        let faces = self
            .faces
            .into_iter()
            .map(|face| match face {
                FaceRecord::Mesh { mesh } => {
                    FaceLandmarks::Mesh(MeshLandmarks::from_normalized(&mesh, width, height))
                }
                FaceRecord::Named(named) => FaceLandmarks::Named(named),
            })
            .collect();

        LandmarkFrame {
            sequence: self.sequence,
            timestamp_ns: self.timestamp_ns,
            width,
            height,
            faces,
        }
    }
}

/// Replays recorded landmark frames from a line-oriented reader
pub struct ReplayFeed<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl ReplayFeed<BufReader<File>> {
    /// Open a recorded session file
    pub fn open(path: &Path) -> Result<Self, CameraError> {
        let file = File::open(path).map_err(|source| CameraError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Replaying landmark frames from {}", path.display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl ReplayFeed<BufReader<Stdin>> {
    /// Read frames piped in by a landmark model process
    pub fn stdin() -> Self {
        info!("Reading landmark frames from stdin");
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: BufRead> ReplayFeed<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    /// Lines consumed so far
    pub fn line(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> FrameSource for ReplayFeed<R> {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, CameraError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                debug!(lines = self.line, "Replay exhausted");
                return Ok(None);
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }

            let record: FrameRecord = serde_json::from_str(text).map_err(|source| {
                CameraError::Decode {
                    line: self.line,
                    source,
                }
            })?;
            return Ok(Some(record.into_frame()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use face_geometry::{FacePoint, LandmarkSource, Point2, Side};
    use std::io::Cursor;

    const NAMED_FACE: &str = r#"{"left_eye":[[250,200],[258,198],[272,198],[280,200],[272,202],[258,202]],"right_eye":[[360,200],[368,198],[382,198],[390,200],[382,202],[368,202]],"mouth":[[320,297],[320,303],[290,300],[350,300]]}"#;

    fn feed(text: &str) -> ReplayFeed<Cursor<Vec<u8>>> {
        ReplayFeed::new(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn test_named_face_and_blank_lines() {
        let text = format!(
            "{{\"sequence\":1,\"timestamp_ns\":5,\"width\":640,\"height\":480,\"faces\":[{NAMED_FACE}]}}\n\n{{\"sequence\":2,\"width\":640,\"height\":480}}\n"
        );
        let mut feed = feed(&text);

        let first = feed.next_frame().unwrap().unwrap();
        assert_eq!(first.sequence, 1);
        assert_eq!(first.timestamp_ns, 5);
        let face = first.primary_face().unwrap();
        assert_eq!(face.point(FacePoint::MouthRightCorner), Some(Point2::new(350.0, 300.0)));

        let second = feed.next_frame().unwrap().unwrap();
        assert_eq!(second.sequence, 2);
        assert!(second.primary_face().is_none());

        assert!(feed.next_frame().unwrap().is_none());
        assert_eq!(feed.line(), 3);
    }

    #[test]
    fn test_mesh_face_is_scaled_to_pixels() {
        let mut mesh = vec![[0.0, 0.0]; 468];
        mesh[33] = [0.5, 0.25];
        let line = serde_json::json!({
            "sequence": 1, "width": 640, "height": 480, "faces": [{"mesh": mesh}]
        });
        let mut feed = feed(&line.to_string());

        let frame = feed.next_frame().unwrap().unwrap();
        let face = frame.primary_face().unwrap();
        assert!(matches!(face, FaceLandmarks::Mesh(m) if m.len() == 468));
        assert_eq!(
            face.point(FacePoint::EyeOuterCorner(Side::Left)),
            Some(Point2::new(320.0, 120.0))
        );
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let mut feed = feed("{\"sequence\":1,\"width\":640,\"height\":480}\nnot json\n");
        assert!(feed.next_frame().unwrap().is_some());
        assert!(matches!(
            feed.next_frame(),
            Err(CameraError::Decode { line: 2, .. })
        ));
    }
}
