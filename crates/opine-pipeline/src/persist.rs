//! Writing and reading the `opinions.json` contract file.

use std::path::{Path, PathBuf};

use opine_core::PipelineOutput;
use tokio::io::AsyncWriteExt;

use crate::error::PipelineError;

/// Serialize `output` as indented JSON and replace the file at `path`.
///
/// The JSON is written to a hidden sibling (`.<name>.tmp`), synced, and then
/// renamed over `path`, so readers never observe a partially written file.
/// Parent directories are not created.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] if the temporary file cannot be written or
/// renamed. The temporary file is removed on failure.
pub async fn save(output: &PipelineOutput, path: &Path) -> Result<(), PipelineError> {
    let mut json =
        serde_json::to_vec_pretty(output).map_err(|source| PipelineError::InvalidJson {
            context: "pipeline output".to_string(),
            source,
        })?;
    json.push(b'\n');

    let tmp = temp_path(path);
    if let Err(e) = write_synced(&tmp, &json).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(PipelineError::io(tmp, e));
    }

    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(PipelineError::io(path, e));
    }

    tracing::info!(
        path = %path.display(),
        articles = output.articles.len(),
        tweets = output.tweets.len(),
        failures = output.failures.len(),
        "saved pipeline output"
    );
    Ok(())
}

/// Read a file written by [`save`].
///
/// # Errors
///
/// Returns [`PipelineError::Io`] if the file cannot be read and
/// [`PipelineError::InvalidJson`] if it does not match the output schema.
pub async fn load(path: &Path) -> Result<PipelineOutput, PipelineError> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| PipelineError::io(path, e))?;
    serde_json::from_slice(&raw).map_err(|source| PipelineError::InvalidJson {
        context: path.display().to_string(),
        source,
    })
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "output".to_string(), |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_is_hidden_sibling() {
        assert_eq!(
            temp_path(Path::new("/data/opinions.json")),
            PathBuf::from("/data/.opinions.json.tmp")
        );
        assert_eq!(
            temp_path(Path::new("opinions.json")),
            PathBuf::from(".opinions.json.tmp")
        );
    }
}
