//! Defines the endpoint for importing transactions from an uploaded CSV file.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use axum::{
    Json,
    extract::{FromRef, Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

use crate::{
    AppState, Error,
    csv_import::TransactionImporter,
    models::Transaction,
    stores::sqlite::{SQLiteCategoryStore, SQLiteTransactionStore},
};

/// The name of the multipart form field that holds the CSV file.
const FILE_FIELD: &str = "file";

/// The default limit for the body of an import request, 50 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Settings for receiving import files.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportConfig {
    /// The directory uploaded files are written to before they are imported.
    pub upload_dir: PathBuf,
    /// How long to wait for an upload to finish.
    pub timeout: Duration,
    /// The largest request body accepted by the import route, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            upload_dir: std::env::temp_dir(),
            timeout: Duration::from_secs(30),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// The state needed for importing transactions.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// Creates the transactions and categories from the uploaded file.
    pub importer: TransactionImporter<SQLiteCategoryStore, SQLiteTransactionStore>,
    /// Where to put the uploaded file and how long to wait for it.
    pub config: ImportConfig,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            importer: TransactionImporter::new(
                SQLiteCategoryStore::new(state.db_connection.clone()),
                SQLiteTransactionStore::new(state.db_connection.clone()),
            ),
            config: state.import_config.clone(),
        }
    }
}

/// Route handler for importing transactions from a CSV file.
///
/// The file is read from the multipart field `file` and written to the upload
/// directory. It is removed once the import is done.
pub async fn import_transactions_endpoint(
    State(state): State<ImportState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Vec<Transaction>>), Error> {
    let start_time = std::time::Instant::now();
    let path = state
        .config
        .upload_dir
        .join(format!("{}.csv", Uuid::new_v4()));

    let upload = spool_upload(multipart, &path, &state.config);

    match tokio::time::timeout(state.config.timeout, upload).await {
        Ok(Ok(())) => {}
        Ok(Err(error)) => {
            remove_partial_upload(&path).await;
            return Err(error);
        }
        Err(_) => {
            tracing::warn!(
                "upload did not finish within {:.1}s",
                state.config.timeout.as_secs_f64()
            );
            remove_partial_upload(&path).await;
            return Err(Error::ImportTimedOut);
        }
    }

    let importer = state.importer;
    let transactions = tokio::task::spawn_blocking(move || importer.import_file(&path))
        .await
        .map_err(|error| {
            tracing::error!("import task failed: {error}");
            Error::ImportTaskFailed(error.to_string())
        })??;

    tracing::debug!(
        "import of {} transactions took {}ms",
        transactions.len(),
        start_time.elapsed().as_millis()
    );

    Ok((StatusCode::CREATED, Json(transactions)))
}

/// Convert a multipart error, keeping the size limit of `config` when the body was too large.
fn multipart_error(error: MultipartError, config: &ImportConfig) -> Error {
    tracing::error!("Could not read multipart form: {error}");

    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::UploadTooLarge {
            limit: config.max_upload_bytes,
        }
    } else {
        Error::MultipartError(error.body_text())
    }
}

fn upload_error(error: std::io::Error) -> Error {
    tracing::error!("Could not write uploaded file: {error}");
    Error::UploadError(error.to_string())
}

/// Write the contents of the `file` field to `path`.
async fn spool_upload(
    mut multipart: Multipart,
    path: &Path,
    config: &ImportConfig,
) -> Result<(), Error> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|error| multipart_error(error, config))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("unnamed").to_owned();
        let mut file = fs::File::create(path).await.map_err(upload_error)?;
        let mut size = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|error| multipart_error(error, config))?
        {
            size += chunk.len();
            file.write_all(&chunk).await.map_err(upload_error)?;
        }

        file.flush().await.map_err(upload_error)?;

        tracing::debug!(
            "Received file '{file_name}' that is {size} bytes, saved to {}",
            path.display()
        );

        return Ok(());
    }

    Err(Error::MissingImportFile)
}

async fn remove_partial_upload(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => {
            tracing::warn!("could not remove upload {}: {error}", path.display());
        }
    }
}
