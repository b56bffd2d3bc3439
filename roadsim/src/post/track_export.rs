use crate::core::track::Track;
use anyhow::Context;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct SegmentRecord<'a> {
    index: usize,
    z: f64,
    left_x: f64,
    right_x: f64,
    center_x: f64,
    curvature: f64,
    decoration: &'a str,
    decoration_offset: f64,
}

/// write_track_csv writes one line per segment containing its geometry and decoration, e.g. for
/// plotting the generated track.
pub fn write_track_csv(track: &Track, filepath: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(filepath).context(format!(
        "Failed to open track export file {}!",
        filepath.display()
    ))?;

    for segment in track.segments() {
        let (decoration, decoration_offset) = match &segment.decoration {
            Some(deco) => (deco.image_key.as_str(), deco.offset),
            None => ("", 0.0),
        };

        writer
            .serialize(SegmentRecord {
                index: segment.index,
                z: segment.z(),
                left_x: segment.left.x,
                right_x: segment.right.x,
                center_x: segment.center_x(),
                curvature: segment.curvature,
                decoration,
                decoration_offset,
            })
            .context("Failed to write segment to track export file!")?;
    }

    writer
        .flush()
        .context("Failed to flush track export file!")?;

    tracing::info!(
        "Exported {} segments to {}",
        track.segment_count(),
        filepath.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::track::TrackPars;
    use crate::render::palette::Palette;

    #[test]
    fn writes_one_line_per_segment() {
        let pars = TrackPars {
            segment_count: 150,
            ..TrackPars::default()
        };
        let track = Track::from_seed(&pars, &Palette::default(), Some(5)).unwrap();
        let path = std::env::temp_dir().join(format!("roadsim_track_{}.csv", std::process::id()));

        write_track_csv(&track, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "index");
        assert_eq!(&headers[6], "decoration");

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(records.len(), 150);
        assert_eq!(&records[0][0], "0");
        assert_eq!(&records[149][1], "14900.0");
        // segments 60 and 80 are the only decorated ones outside the exclusion margins
        assert!(!records[60][6].is_empty());
        assert!(!records[80][6].is_empty());
        assert!(records[40][6].is_empty());
        assert!(records[100][6].is_empty());
    }
}
