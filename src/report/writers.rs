use std::path::Path;

use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::{AppError, AppResult, SinkError};

/// Writes rendered output to `path`, or to stdout when no path is given.
///
/// # Errors
///
/// Returns an error when the file cannot be created or written, or stdout
/// is closed.
pub async fn write_output(bytes: &[u8], path: Option<&Path>) -> AppResult<()> {
    match path {
        Some(path) => write_file(path, bytes).await.map_err(|err| {
            AppError::sink(SinkError::WriteReport {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        None => write_stdout(bytes)
            .await
            .map_err(|err| AppError::sink(SinkError::WriteStdout { source: err })),
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes).await?;
    writer.flush().await?;
    Ok(())
}

async fn write_stdout(bytes: &[u8]) -> Result<(), std::io::Error> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(bytes).await?;
    stdout.flush().await?;
    Ok(())
}
