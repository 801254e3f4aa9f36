//! Reading the topic-model export from disk.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use surface_topics::TopicModelOutput;
use surface_types::SurfaceError;

/// Read a topic-model export JSON file.
///
/// # Errors
///
/// `Io` when the file cannot be opened, `InvalidInput` when it does not
/// parse as a topic-model export.
pub fn read_topic_model(path: impl AsRef<Path>) -> Result<TopicModelOutput, SurfaceError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SurfaceError::io(path, e))?;
    let model: TopicModelOutput = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| SurfaceError::InvalidInput(format!("{}: {}", path.display(), e)))?;
    debug!(
        path = %path.display(),
        topics = model.topics.len(),
        frequencies = model.frequencies.len(),
        "read topic model export"
    );
    Ok(model)
}
