//! GeoJSON point export and import of topic observations.
//!
//! Each observation becomes a Point feature whose coordinates are the
//! scaled `(x, y)`. Properties carry the slice label, topic label, the
//! comma-joined ranked terms with their weights, the frequency, the topic
//! id and the unscaled coordinates rounded to 6 decimals.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use surface_types::{
    terms_as_string, SurfaceError, TermWeight, TimeLabel, TopicId, TopicObservation,
};

const FEATURE_COLLECTION: &str = "FeatureCollection";
const FEATURE: &str = "Feature";
const POINT: &str = "Point";

/// GeoJSON feature collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

/// GeoJSON feature holding one observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: ObservationProperties,
}

/// GeoJSON geometry; only points are produced or accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

/// Feature properties of one observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationProperties {
    pub t: TimeLabel,
    pub label: String,
    /// Ranked terms joined by commas
    pub top_terms: String,
    /// Weights aligned with `top_terms`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_term_weights: Option<Vec<f64>>,
    pub n: f64,
    pub topic_id: Option<TopicId>,
    /// Unscaled x, rounded to 6 decimals
    pub x: f64,
    /// Unscaled y, rounded to 6 decimals
    pub y: f64,
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

/// Writes observations as GeoJSON with per-axis coordinate scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoEncoder {
    x_scale: f64,
    y_scale: f64,
}

impl Default for GeoEncoder {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl GeoEncoder {
    pub fn new(x_scale: f64, y_scale: f64) -> Self {
        Self { x_scale, y_scale }
    }

    /// Build the feature collection for `observations`.
    pub fn to_collection(&self, observations: &[TopicObservation]) -> FeatureCollection {
        let features = observations
            .iter()
            .map(|obs| Feature {
                kind: FEATURE.to_string(),
                geometry: Geometry {
                    kind: POINT.to_string(),
                    coordinates: vec![obs.x * self.x_scale, obs.y * self.y_scale],
                },
                properties: ObservationProperties {
                    t: obs.t.clone(),
                    label: obs.label.clone(),
                    top_terms: terms_as_string(&obs.top_terms),
                    top_term_weights: Some(obs.top_terms.iter().map(|t| t.weight).collect()),
                    n: obs.n,
                    topic_id: obs.id,
                    x: round6(obs.x),
                    y: round6(obs.y),
                },
            })
            .collect();

        FeatureCollection {
            kind: FEATURE_COLLECTION.to_string(),
            features,
        }
    }

    /// Serialize observations to `writer`.
    pub fn write<W: Write>(
        &self,
        writer: W,
        observations: &[TopicObservation],
    ) -> Result<(), SurfaceError> {
        serde_json::to_writer(writer, &self.to_collection(observations))?;
        Ok(())
    }

    /// Write observations to the GeoJSON file at `path`.
    pub fn export(
        &self,
        path: impl AsRef<Path>,
        observations: &[TopicObservation],
    ) -> Result<(), SurfaceError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| SurfaceError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer, observations)?;
        writer.flush().map_err(|e| SurfaceError::io(path, e))?;
        debug!(path = %path.display(), features = observations.len(), "wrote GeoJSON");
        Ok(())
    }
}

/// Convert a feature collection back into observations.
///
/// Coordinates come from the (scaled) point geometry and `id` is left
/// unknown. Terms without a stored weight get weight 0.0.
pub fn from_collection(
    collection: FeatureCollection,
) -> Result<Vec<TopicObservation>, SurfaceError> {
    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(i, feature)| {
            let geometry = feature.geometry;
            if geometry.kind != POINT || geometry.coordinates.len() < 2 {
                return Err(SurfaceError::InvalidInput(format!(
                    "feature {} is not a 2D point",
                    i
                )));
            }
            let props = feature.properties;
            Ok(TopicObservation {
                x: geometry.coordinates[0],
                y: geometry.coordinates[1],
                t: props.t,
                id: None,
                n: props.n,
                label: props.label,
                top_terms: split_terms(&props.top_terms, props.top_term_weights.as_deref()),
            })
        })
        .collect()
}

fn split_terms(joined: &str, weights: Option<&[f64]>) -> Vec<TermWeight> {
    if joined.is_empty() {
        return Vec::new();
    }
    let terms: Vec<&str> = joined.split(',').collect();
    let weights = weights.filter(|w| w.len() == terms.len());
    terms
        .into_iter()
        .enumerate()
        .map(|(i, term)| TermWeight::new(term, weights.map_or(0.0, |w| w[i])))
        .collect()
}

/// Read observations from GeoJSON.
pub fn read_observations<R: Read>(reader: R) -> Result<Vec<TopicObservation>, SurfaceError> {
    let collection: FeatureCollection =
        serde_json::from_reader(reader).map_err(|e| SurfaceError::InvalidInput(e.to_string()))?;
    from_collection(collection)
}

/// Read observations from the GeoJSON file at `path`.
pub fn import_observations(path: impl AsRef<Path>) -> Result<Vec<TopicObservation>, SurfaceError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SurfaceError::io(path, e))?;
    let observations = read_observations(BufReader::new(file))?;
    debug!(path = %path.display(), features = observations.len(), "read GeoJSON");
    Ok(observations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<TopicObservation> {
        vec![
            TopicObservation {
                x: 0.0,
                y: 0.123456789,
                t: TimeLabel::Index(0),
                id: Some(4),
                n: 12.0,
                label: "vaccine,dose".to_string(),
                top_terms: vec![TermWeight::new("vaccine", 0.4), TermWeight::new("dose", 0.2)],
            },
            TopicObservation {
                x: 1.0,
                y: 2.5,
                t: TimeLabel::Label("2021-02".to_string()),
                id: Some(7),
                n: 3.0,
                label: "mask".to_string(),
                top_terms: vec![TermWeight::new("mask", 0.9)],
            },
        ]
    }

    #[test]
    fn test_export_scales_coordinates() {
        let fc = GeoEncoder::new(100.0, 10.0).to_collection(&sample());
        assert_eq!(fc.kind, "FeatureCollection");
        assert_eq!(fc.features[1].geometry.coordinates, vec![100.0, 25.0]);
        assert_eq!(fc.features[1].geometry.kind, "Point");
        let props = &fc.features[0].properties;
        assert_eq!(props.y, 0.123457);
        assert_eq!(props.topic_id, Some(4));
        assert_eq!(props.top_terms, "vaccine,dose");
    }

    #[test]
    fn test_property_names() {
        let mut buf = Vec::new();
        GeoEncoder::default().write(&mut buf, &sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let props = &value["features"][0]["properties"];
        for key in ["t", "label", "top_terms", "n", "topic_id", "x", "y"] {
            assert!(props.get(key).is_some(), "missing property {}", key);
        }
        assert_eq!(value["features"][0]["type"], "Feature");
        assert_eq!(value["features"][1]["properties"]["t"], "2021-02");
    }

    #[test]
    fn test_round_trip_unit_scale() {
        let mut buf = Vec::new();
        GeoEncoder::default().write(&mut buf, &sample()).unwrap();
        let back = read_observations(buf.as_slice()).unwrap();

        assert_eq!(back.len(), 2);
        for (orig, read) in sample().iter().zip(&back) {
            assert_eq!(read.id, None);
            assert_eq!(read.x, orig.x);
            assert_eq!(read.y, orig.y);
            assert_eq!(read.t, orig.t);
            assert_eq!(read.n, orig.n);
            assert_eq!(read.label, orig.label);
            assert_eq!(read.top_terms, orig.top_terms);
        }
    }

    #[test]
    fn test_import_without_weights() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature",
             "geometry": {"type": "Point", "coordinates": [300, 50.5]},
             "properties": {"t": 3, "label": "a,b", "top_terms": "a,b,c", "n": 8,
                            "topic_id": 2, "x": 3, "y": 0.505}}
        ]}"#;
        let obs = read_observations(json.as_bytes()).unwrap();
        assert_eq!(obs[0].point(), (300.0, 50.5));
        assert_eq!(obs[0].t, TimeLabel::Index(3));
        assert_eq!(obs[0].id, None);
        assert_eq!(obs[0].top_terms.len(), 3);
        assert!(obs[0].top_terms.iter().all(|t| t.weight == 0.0));
    }

    #[test]
    fn test_import_fractional_time() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature",
             "geometry": {"type": "Point", "coordinates": [0, 1]},
             "properties": {"t": 1612137600.25, "label": "a", "top_terms": "a", "n": 2,
                            "topic_id": 0, "x": 0, "y": 0.01}},
            {"type": "Feature",
             "geometry": {"type": "Point", "coordinates": [100, 2]},
             "properties": {"t": "2021-02", "label": "a", "top_terms": "a", "n": 1,
                            "topic_id": 0, "x": 1, "y": 0.02}}
        ]}"#;
        let obs = read_observations(json.as_bytes()).unwrap();
        assert!(matches!(obs[0].t, TimeLabel::Number(_)));
        assert_eq!(obs[0].t.to_string(), "1612137600.25");
        assert_eq!(obs[1].t, TimeLabel::from("2021-02"));

        let mut buf = Vec::new();
        GeoEncoder::default().write(&mut buf, &obs).unwrap();
        let back = read_observations(buf.as_slice()).unwrap();
        assert_eq!(back[0].t, obs[0].t);
    }

    #[test]
    fn test_non_point_rejected() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature",
             "geometry": {"type": "LineString", "coordinates": [1, 2]},
             "properties": {"t": 0, "label": "", "top_terms": "", "n": 1,
                            "topic_id": null, "x": 0, "y": 0}}
        ]}"#;
        let err = read_observations(json.as_bytes()).unwrap_err();
        assert!(matches!(err, SurfaceError::InvalidInput(_)));
    }

    #[test]
    fn test_export_import_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.topiclocation.geojson");
        GeoEncoder::new(2.0, 2.0).export(&path, &sample()).unwrap();
        let back = import_observations(&path).unwrap();
        assert_eq!(back[1].point(), (2.0, 5.0));
    }

    #[test]
    fn test_import_missing_file_reports_path() {
        let err = import_observations("/nonexistent/locs.geojson").unwrap_err();
        match err {
            SurfaceError::Io { path, .. } => {
                assert!(path.ends_with("locs.geojson"))
            }
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
