//! Revocable preview handles and the preview loader.
//!
//! A preview handle stands in for the selected file's bytes so the preview
//! pane can read them without holding the file itself. Handles are minted
//! only by [`PreviewRegistry`], which is what makes a [`TrustedPreview`]
//! trusted: the preview surface accepts nothing else.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::LoadError;
use crate::engine::DocumentEngine;
use crate::intake::FileSource;

/// Opaque identifier of a live preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PreviewHandle(u64);

impl PreviewHandle {
    pub fn url(&self) -> String {
        format!("pdfglance-preview:{}", self.0)
    }
}

impl fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

/// A preview handle minted by the registry and marked safe for the preview
/// surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrustedPreview {
    handle: PreviewHandle,
}

impl TrustedPreview {
    pub fn handle(&self) -> PreviewHandle {
        self.handle
    }
}

/// Owner of all live preview handles.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    next_id: u64,
    live: HashMap<PreviewHandle, FileSource>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a new handle over `source`.
    pub fn create(&mut self, source: FileSource) -> TrustedPreview {
        self.next_id += 1;
        let handle = PreviewHandle(self.next_id);
        self.live.insert(handle, source);
        tracing::debug!(handle = %handle, live = self.live.len(), "preview handle created");
        TrustedPreview { handle }
    }

    /// Release a handle. Returns false if it was already released.
    pub fn revoke(&mut self, preview: &TrustedPreview) -> bool {
        let removed = self.live.remove(&preview.handle).is_some();
        if removed {
            tracing::debug!(handle = %preview.handle, live = self.live.len(), "preview handle revoked");
        }
        removed
    }

    /// The source behind a live handle.
    pub fn resolve(&self, preview: &TrustedPreview) -> Option<FileSource> {
        self.live.get(&preview.handle).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

/// What the preview pane shows once a document has loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewSummary {
    pub page_count: usize,
    /// Leading text runs of the first page.
    pub excerpt: Vec<String>,
}

/// A pending preview load for the current handle.
#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub handle: PreviewHandle,
    pub source: FileSource,
}

impl PreviewRequest {
    /// Read the bytes, open the document, and summarise it.
    pub async fn load(
        self,
        engine: Arc<dyn DocumentEngine>,
        max_lines: usize,
    ) -> Result<PreviewSummary, LoadError> {
        let bytes = self.source.read_bytes().await?;
        tokio::task::spawn_blocking(move || -> Result<PreviewSummary, LoadError> {
            let document = engine.open(&bytes)?;
            let page_count = document.page_count();
            let excerpt = if page_count > 0 {
                let mut runs = document.page(1)?.text_runs()?;
                runs.retain(|r| !r.trim().is_empty());
                runs.truncate(max_lines);
                runs
            } else {
                Vec::new()
            };
            Ok(PreviewSummary {
                page_count,
                excerpt,
            })
        })
        .await
        .map_err(|e| LoadError::Task(e.to_string()))?
    }
}
