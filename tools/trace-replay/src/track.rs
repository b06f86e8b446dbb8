use anyhow::{bail, Context, Result};
use geo::Point;
use geojson::{GeoJson, Value};
use std::path::Path;

/// Read a recorded track as longitude/latitude samples.
///
/// Accepts a LineString, a Feature or a FeatureCollection. In a collection,
/// LineStrings are concatenated and Point features are taken in order, so
/// both a single exported track and a list of raw fixes work.
pub fn read_track(path: &Path) -> Result<Vec<Point>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read track file: {}", path.display()))?;

    parse_track(&content).with_context(|| format!("No usable track found in: {}", path.display()))
}

pub fn parse_track(content: &str) -> Result<Vec<Point>> {
    let geojson: GeoJson = content.parse().context("Failed to parse GeoJSON")?;

    let mut samples = Vec::new();
    match geojson {
        GeoJson::Geometry(geom) => push_samples(&mut samples, geom.value)?,
        GeoJson::Feature(feature) => {
            let Some(geom) = feature.geometry else {
                bail!("Feature has no geometry")
            };
            push_samples(&mut samples, geom.value)?;
        }
        GeoJson::FeatureCollection(fc) => {
            for feature in fc.features {
                if let Some(geom) = feature.geometry {
                    push_samples(&mut samples, geom.value)?;
                }
            }
        }
    }

    if samples.is_empty() {
        bail!("Track contains no positions");
    }
    Ok(samples)
}

fn push_samples(samples: &mut Vec<Point>, value: Value) -> Result<()> {
    match value {
        Value::Point(position) => samples.push(to_point(&position)?),
        Value::LineString(line) => {
            for position in &line {
                samples.push(to_point(position)?);
            }
        }
        Value::MultiLineString(lines) => {
            for position in lines.iter().flatten() {
                samples.push(to_point(position)?);
            }
        }
        _ => log::warn!("Skipping geometry that is neither a Point nor a line"),
    }
    Ok(())
}

fn to_point(position: &[f64]) -> Result<Point> {
    match position {
        [lon, lat, ..] => Ok(Point::new(*lon, *lat)),
        _ => bail!("Position has fewer than two coordinates"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_linestring_track() {
        let track = parse_track(
            r#"{"type": "LineString", "coordinates": [[14.42, 50.10], [14.43, 50.11, 230.0]]}"#,
        )
        .unwrap();

        assert_eq!(track, vec![Point::new(14.42, 50.10), Point::new(14.43, 50.11)]);
    }

    #[test]
    fn test_point_features_in_order() {
        let track = parse_track(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
                {"type": "Feature", "properties": {}, "geometry": null},
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [3.0, 4.0]}}
            ]}"#,
        )
        .unwrap();

        assert_eq!(track, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
    }

    #[test]
    fn test_empty_track_is_rejected() {
        assert!(parse_track(r#"{"type": "FeatureCollection", "features": []}"#).is_err());
        assert!(parse_track(r#"{"type": "Point", "coordinates": [1.0]}"#).is_err());
    }

    #[test]
    fn test_read_track_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"type": "LineString", "coordinates": [[5.0, 6.0]]}}"#).unwrap();

        assert_eq!(read_track(file.path()).unwrap(), vec![Point::new(5.0, 6.0)]);
        assert!(read_track(Path::new("/nonexistent/track.geojson")).is_err());
    }
}
