//! End-to-end pipeline tests for topic-surface.
//!
//! Topic-model export -> locate -> GeoJSON -> import -> KDE -> ASCII grid.

use pretty_assertions::assert_eq;

use e2e_tests::{grid_data_lines, sample_model, TestHarness};
use surface_cli::{locate_command, run_pipeline, surface_command, StageOutcome};
use surface_io::import_observations;
use surface_topics::{FrequencyRecord, TopicModelOutput, TopicRecord};
use surface_types::{Settings, SurfaceError, TimeLabel};

/// Full run writes both files, with one grid line per configured row.
#[test]
fn test_run_pipeline_writes_locations_and_surface() {
    let harness = TestHarness::new();
    let input = harness.write_model("model.json", &sample_model(6, 5));
    let settings = harness.settings();

    let outputs = run_pipeline(&settings, &input, "covid")
        .unwrap()
        .expect("pipeline should produce output");

    assert!(outputs.locations.exists());
    assert!(outputs.surface.exists());
    assert!(outputs
        .surface
        .to_string_lossy()
        .ends_with("covid.surface.asc"));

    let text = std::fs::read_to_string(&outputs.surface).unwrap();
    let header: Vec<&str> = text.lines().take(7).collect();
    assert_eq!(header[0], "NROWS 20");
    assert!(header[1].starts_with("NCOLS "));
    assert_eq!(header[2], "XLLCENTER 0");
    assert_eq!(header[3], "YLLCENTER 0");
    assert_eq!(header[6], "NODATA_VALUE -1");

    let rows = grid_data_lines(&outputs.surface);
    assert_eq!(rows.len(), 20);
    let cols: usize = header[1]["NCOLS ".len()..].parse().unwrap();
    assert!(rows.iter().all(|r| r.split_whitespace().count() == cols));
}

/// Located observations never carry the outlier topic and are only emitted
/// for non-zero frequencies.
#[test]
fn test_locations_exclude_outlier() {
    let harness = TestHarness::new();
    let input = harness.write_model("model.json", &sample_model(6, 5));
    let output = harness.path("locs.geojson");

    let outcome = locate_command(&harness.settings(), &input, &output).unwrap();
    // 6 topics x 5 slices minus the (k + s) % 3 == 0 holes
    let expected = (0..5)
        .flat_map(|s| (0..6).map(move |k| (k + s) % 3 != 0))
        .filter(|present| *present)
        .count();
    assert_eq!(
        outcome,
        StageOutcome::Written {
            path: output.clone(),
            items: expected
        }
    );

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let features = json["features"].as_array().unwrap();
    assert_eq!(features.len(), expected);
    assert!(features
        .iter()
        .all(|f| f["properties"]["topic_id"].as_i64() != Some(-1)));
    assert!(features
        .iter()
        .all(|f| f["properties"]["n"].as_f64().unwrap() > 0.0));
}

/// Round trip with unit scales preserves everything but the topic id.
#[test]
fn test_geojson_round_trip_through_locator() {
    let harness = TestHarness::new();
    let model = sample_model(4, 3);
    let prepared = model.clone().prepare(30, 1).unwrap();
    let observations = prepared
        .locator()
        .unwrap()
        .locate(&prepared.terms, &prepared.slices)
        .unwrap();

    let input = harness.write_model("model.json", &model);
    let output = harness.path("locs.geojson");
    let settings = Settings {
        x_scale: 1.0,
        y_scale: 1.0,
        ..harness.settings()
    };
    locate_command(&settings, &input, &output).unwrap();
    let back = import_observations(&output).unwrap();

    assert_eq!(back.len(), observations.len());
    for (orig, read) in observations.iter().zip(&back) {
        assert_eq!(read.id, None);
        assert_eq!(read.x, orig.x);
        assert!((read.y - orig.y).abs() < 1e-6);
        assert_eq!(read.t, orig.t);
        assert_eq!(read.n, orig.n);
        assert_eq!(read.label, orig.label);
        assert_eq!(read.top_terms, orig.top_terms);
    }
}

/// Parallel and sequential interpolation write identical grids.
#[test]
fn test_parallel_and_sequential_surfaces_match() {
    let harness = TestHarness::new();
    let input = harness.write_model("model.json", &sample_model(7, 6));
    let locations = harness.path("locs.geojson");
    locate_command(&harness.settings(), &input, &locations).unwrap();

    let parallel = harness.path("parallel.asc");
    let sequential = harness.path("sequential.asc");
    surface_command(
        &Settings {
            parallel: true,
            ..harness.settings()
        },
        &locations,
        &parallel,
    )
    .unwrap();
    surface_command(
        &Settings {
            parallel: false,
            ..harness.settings()
        },
        &locations,
        &sequential,
    )
    .unwrap();

    assert_eq!(
        std::fs::read_to_string(&parallel).unwrap(),
        std::fs::read_to_string(&sequential).unwrap()
    );
}

/// A model with only the outlier topic is a valid, empty terminal state.
#[test]
fn test_model_without_topics_produces_no_output() {
    let harness = TestHarness::new();
    let model = TopicModelOutput {
        topics: vec![TopicRecord {
            id: -1,
            size: None,
            top_terms: vec![("misc".to_string(), 1.0)],
            embedding: vec![1.0, 0.0],
        }],
        leaf_order: None,
        frequencies: vec![FrequencyRecord {
            topic: -1,
            timestamp: TimeLabel::Index(0),
            frequency: 9.0,
        }],
    };
    let input = harness.write_model("model.json", &model);
    let settings = harness.settings();

    assert!(run_pipeline(&settings, &input, "empty").unwrap().is_none());
    assert!(!settings.output_path().join("empty.topiclocation.geojson").exists());
    assert!(!settings.output_path().join("empty.surface.asc").exists());
}

/// Two orthogonal topics at disjoint slices both land at y = 0, so the
/// surface has no vertical extent and interpolation refuses it.
#[test]
fn test_disjoint_topics_give_degenerate_surface() {
    let harness = TestHarness::new();
    let model = TopicModelOutput {
        topics: vec![
            TopicRecord {
                id: 0,
                size: None,
                top_terms: vec![("alpha".to_string(), 1.0)],
                embedding: vec![1.0, 0.0],
            },
            TopicRecord {
                id: 1,
                size: None,
                top_terms: vec![("beta".to_string(), 1.0)],
                embedding: vec![0.0, 1.0],
            },
        ],
        leaf_order: Some(vec![0, 1]),
        frequencies: vec![
            FrequencyRecord {
                topic: 0,
                timestamp: TimeLabel::Index(0),
                frequency: 5.0,
            },
            FrequencyRecord {
                topic: 1,
                timestamp: TimeLabel::Index(1),
                frequency: 3.0,
            },
        ],
    };
    let input = harness.write_model("model.json", &model);
    let locations = harness.path("locs.geojson");
    locate_command(&harness.settings(), &input, &locations).unwrap();

    let back = import_observations(&locations).unwrap();
    assert_eq!(back.len(), 2);
    assert!(back.iter().all(|o| o.y == 0.0));
    assert_eq!(back[1].x, 100.0);

    let err = surface_command(&harness.settings(), &locations, &harness.path("s.asc"))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SurfaceError>(),
        Some(SurfaceError::DegenerateInput(_))
    ));
}

/// Malformed exports are rejected before anything is written.
#[test]
fn test_misaligned_leaf_order_is_invalid_input() {
    let harness = TestHarness::new();
    let mut model = sample_model(3, 2);
    model.leaf_order = Some(vec![0, 1, 2, 9]);
    let input = harness.write_model("model.json", &model);
    let output = harness.path("locs.geojson");

    let err = locate_command(&harness.settings(), &input, &output).unwrap_err();
    assert!(err
        .chain()
        .any(|e| matches!(e.downcast_ref::<SurfaceError>(), Some(SurfaceError::InvalidInput(_)))));
    assert!(!output.exists());
}
