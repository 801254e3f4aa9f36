//! End-to-end test infrastructure for topic-surface.
//!
//! Provides a shared TestHarness and fixture builders for tests covering
//! the full topic-model -> GeoJSON -> surface pipeline.

use std::path::{Path, PathBuf};

use surface_topics::{FrequencyRecord, TopicModelOutput, TopicRecord};
use surface_types::{Settings, TimeLabel, TopicId, OUTLIER_TOPIC_ID};

/// Shared test harness for E2E tests.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Scratch directory for inputs and outputs
    pub dir: PathBuf,
}

impl TestHarness {
    /// Create a new test harness with a temp directory.
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            dir,
        }
    }

    /// Settings writing into the harness directory with a small grid.
    pub fn settings(&self) -> Settings {
        Settings {
            row_count: 20,
            max_dist: 1.0,
            output_dir: self.dir.join("out").to_string_lossy().to_string(),
            ..Settings::default()
        }
    }

    /// Write `model` as JSON and return its path.
    pub fn write_model(&self, name: &str, model: &TopicModelOutput) -> PathBuf {
        let path = self.dir.join(name);
        let json = serde_json::to_string(model).expect("Failed to serialize model");
        std::fs::write(&path, json).expect("Failed to write model");
        path
    }

    /// Path inside the harness directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a topic-model export with `topic_count` topics over `slice_count`
/// slices, plus an outlier topic present everywhere.
///
/// Embeddings sit on a circle so neighbouring ids are similar. Topic `k`
/// is present at slice `s` unless `(k + s) % 3 == 0`.
pub fn sample_model(topic_count: usize, slice_count: usize) -> TopicModelOutput {
    let mut topics: Vec<TopicRecord> = (0..topic_count as TopicId)
        .map(|id| {
            let angle = id as f32 * 0.5;
            TopicRecord {
                id,
                size: Some(1000 + id as u64),
                top_terms: (0..8)
                    .map(|k| (format!("topic{}_term{}", id, k), 0.5 / (k as f64 + 1.0)))
                    .collect(),
                embedding: vec![angle.cos(), angle.sin(), 0.25],
            }
        })
        .collect();
    topics.push(TopicRecord {
        id: OUTLIER_TOPIC_ID,
        size: Some(50_000),
        top_terms: vec![("the".to_string(), 0.9)],
        embedding: vec![0.3, 0.3, 0.3],
    });

    let mut frequencies = Vec::new();
    for s in 0..slice_count {
        frequencies.push(FrequencyRecord {
            topic: OUTLIER_TOPIC_ID,
            timestamp: TimeLabel::Index(s as i64),
            frequency: 500.0,
        });
        for k in 0..topic_count {
            if (k + s) % 3 != 0 {
                frequencies.push(FrequencyRecord {
                    topic: k as TopicId,
                    timestamp: TimeLabel::Index(s as i64),
                    frequency: (10 + k * s) as f64,
                });
            }
        }
    }

    TopicModelOutput {
        topics,
        leaf_order: None,
        frequencies,
    }
}

/// Data lines of an ASCII grid file, header skipped.
pub fn grid_data_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("Failed to read grid")
        .lines()
        .skip(7)
        .map(str::to_string)
        .collect()
}
