//! On-disk cache for the summary artifact (`summary.json` + `summary.svg`).

use crate::domain::summary::{render_svg, SummaryArtifact};
use crate::storage::StoreError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const SUMMARY_JSON: &str = "summary.json";
pub const SUMMARY_SVG: &str = "summary.svg";

#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    #[error("could not read ranked countries: {0}")]
    Store(#[from] StoreError),

    #[error("artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A cached artifact ready to be served.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedArtifact {
    Svg(String),
    Json(String),
}

impl CachedArtifact {
    pub fn content_type(&self) -> &'static str {
        match self {
            CachedArtifact::Svg(_) => "image/svg+xml",
            CachedArtifact::Json(_) => "application/json",
        }
    }

    pub fn into_body(self) -> String {
        match self {
            CachedArtifact::Svg(body) | CachedArtifact::Json(body) => body,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactCache {
    dir: PathBuf,
}

impl ArtifactCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Overwrites both files. Each is written to a temp file first and renamed into place.
    pub async fn write(&self, summary: &SummaryArtifact) -> Result<(), ArtifactError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(summary)?;
        self.replace(SUMMARY_JSON, json.as_bytes()).await?;
        self.replace(SUMMARY_SVG, render_svg(summary).as_bytes()).await?;
        Ok(())
    }

    /// Prefers the SVG, falls back to the JSON document, `None` when neither exists.
    pub async fn read_preferred(&self) -> Result<Option<CachedArtifact>, ArtifactError> {
        if let Some(svg) = read_optional(&self.dir.join(SUMMARY_SVG)).await? {
            return Ok(Some(CachedArtifact::Svg(svg)));
        }
        Ok(read_optional(&self.dir.join(SUMMARY_JSON))
            .await?
            .map(CachedArtifact::Json))
    }

    async fn replace(&self, file_name: &str, contents: &[u8]) -> Result<(), ArtifactError> {
        let target = self.dir.join(file_name);
        let staging = self.dir.join(format!(".{}.tmp", file_name));
        tokio::fs::write(&staging, contents).await?;
        tokio::fs::rename(&staging, &target).await?;
        Ok(())
    }
}

async fn read_optional(path: &Path) -> Result<Option<String>, std::io::Error> {
    match tokio::fs::read_to_string(path).await {
        Ok(body) => Ok(Some(body)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
