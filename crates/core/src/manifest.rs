//! Listing of generated GIFs, newest first.
//!
//! Used by the HTTP API (`/api/list`) and by the `update-manifest` binary,
//! which writes the same listing to `output/data.json` for static hosting.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// URL prefix used in the static snapshot file.
pub const SNAPSHOT_URL_PREFIX: &str = "output/";

/// Errors that can occur while listing or snapshotting outputs.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read output directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write manifest {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One generated GIF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// File name, e.g. `中.gif`.
    pub name: String,
    /// Fetch location, `url_prefix` followed by the name.
    pub url: String,
    /// Last modification time.
    pub mtime: DateTime<Utc>,
}

/// Result of writing a snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotReport {
    pub path: PathBuf,
    pub count: usize,
}

fn is_gif(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"))
}

fn newest_first(a: &ManifestEntry, b: &ManifestEntry) -> Ordering {
    b.mtime.cmp(&a.mtime).then_with(|| a.name.cmp(&b.name))
}

/// Lists the GIFs in `dir`, newest first (ties by name).
///
/// Only regular files with a `.gif` extension (any case) are included.
pub async fn list_outputs(dir: &Path, url_prefix: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
    let read_err = |source: std::io::Error| ManifestError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut reader = tokio::fs::read_dir(dir).await.map_err(read_err)?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await.map_err(read_err)? {
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!("Skipping non UTF-8 file name in {}", dir.display());
            continue;
        };
        if !is_gif(&name) {
            continue;
        }

        let metadata = entry.metadata().await.map_err(read_err)?;
        if !metadata.is_file() {
            continue;
        }
        let mtime: DateTime<Utc> = metadata.modified().map_err(read_err)?.into();

        entries.push(ManifestEntry {
            url: format!("{}{}", url_prefix, name),
            name,
            mtime,
        });
    }

    entries.sort_by(newest_first);
    Ok(entries)
}

/// Writes the listing of `dir` to `dir/file_name` as pretty-printed JSON.
pub async fn write_snapshot(dir: &Path, file_name: &str) -> Result<SnapshotReport, ManifestError> {
    let entries = list_outputs(dir, SNAPSHOT_URL_PREFIX).await?;
    let json = serde_json::to_string_pretty(&entries)?;

    let path = dir.join(file_name);
    tokio::fs::write(&path, json)
        .await
        .map_err(|source| ManifestError::Write {
            path: path.clone(),
            source,
        })?;

    Ok(SnapshotReport {
        path,
        count: entries.len(),
    })
}
