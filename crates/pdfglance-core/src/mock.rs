//! Hand-rolled engine and clipboard mocks for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::clipboard::{ClipboardError, PrimaryClipboard, SurfaceHost, SurfaceId};
use crate::engine::{Document, DocumentEngine, EngineError, Page};

/// A mock [`DocumentEngine`] serving fixed pages.
///
/// Supports:
/// - A fixed list of pages, each a list of text runs.
/// - Failing on open (corrupt or encrypted input).
/// - Failing on a single page.
/// - Call counting via [`open_count()`](MockEngine::open_count).
pub struct MockEngine {
    pages: Arc<Vec<Vec<String>>>,
    open_error: Option<String>,
    failing_page: Option<usize>,
    open_count: AtomicUsize,
}

impl MockEngine {
    pub fn with_pages<S: Into<String>>(pages: Vec<Vec<S>>) -> Self {
        let pages = pages
            .into_iter()
            .map(|runs| runs.into_iter().map(Into::into).collect())
            .collect();
        Self {
            pages: Arc::new(pages),
            open_error: None,
            failing_page: None,
            open_count: AtomicUsize::new(0),
        }
    }

    /// An engine that refuses every document.
    pub fn failing_open(message: &str) -> Self {
        let mut engine = Self::with_pages(Vec::<Vec<String>>::new());
        engine.open_error = Some(message.to_string());
        engine
    }

    /// Fail when page `index` (1-based) is read.
    pub fn failing_page(mut self, index: usize) -> Self {
        self.failing_page = Some(index);
        self
    }

    /// How many times `open()` has been called.
    pub fn open_count(&self) -> usize {
        self.open_count.load(Ordering::SeqCst)
    }
}

impl DocumentEngine for MockEngine {
    fn open(&self, _bytes: &[u8]) -> Result<Box<dyn Document>, EngineError> {
        self.open_count.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.open_error {
            return Err(EngineError::OpenError(message.clone()));
        }
        Ok(Box::new(MockDocument {
            pages: Arc::clone(&self.pages),
            failing_page: self.failing_page,
        }))
    }
}

struct MockDocument {
    pages: Arc<Vec<Vec<String>>>,
    failing_page: Option<usize>,
}

impl Document for MockDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<Box<dyn Page + '_>, EngineError> {
        if index == 0 || index > self.pages.len() {
            return Err(EngineError::PageOutOfRange {
                page: index,
                count: self.pages.len(),
            });
        }
        Ok(Box::new(MockPage {
            runs: &self.pages[index - 1],
            fail: self.failing_page == Some(index),
        }))
    }
}

struct MockPage<'a> {
    runs: &'a [String],
    fail: bool,
}

impl Page for MockPage<'_> {
    fn text_runs(&self) -> Result<Vec<String>, EngineError> {
        if self.fail {
            return Err(EngineError::ExtractionError("mock page failure".into()));
        }
        Ok(self.runs.to_vec())
    }
}

/// A mock [`PrimaryClipboard`] that records writes or always fails.
#[derive(Default)]
pub struct MockClipboard {
    fail: bool,
    writes: Mutex<Vec<String>>,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn denied() -> Self {
        Self {
            fail: true,
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

impl PrimaryClipboard for MockClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::Denied("mock permission denied".into()));
        }
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// A call recorded by [`MockSurfaceHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Attach(String),
    SelectAll,
    ExecCopy,
    Detach,
}

/// A mock [`SurfaceHost`] recording every call into a shared log.
pub struct MockSurfaceHost {
    fail: bool,
    log: Arc<Mutex<Vec<SurfaceCall>>>,
}

impl MockSurfaceHost {
    pub fn new() -> Self {
        Self {
            fail: false,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A host whose legacy copy command always fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Shared handle to the call log, readable after the host is moved.
    pub fn log(&self) -> Arc<Mutex<Vec<SurfaceCall>>> {
        Arc::clone(&self.log)
    }

    fn record(&self, call: SurfaceCall) {
        self.log.lock().unwrap().push(call);
    }
}

impl Default for MockSurfaceHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceHost for MockSurfaceHost {
    fn attach(&mut self, text: &str) -> SurfaceId {
        self.record(SurfaceCall::Attach(text.to_string()));
        SurfaceId(1)
    }

    fn select_all(&mut self, _id: SurfaceId) {
        self.record(SurfaceCall::SelectAll);
    }

    fn exec_copy(&mut self, _id: SurfaceId) -> Result<(), ClipboardError> {
        self.record(SurfaceCall::ExecCopy);
        if self.fail {
            Err(ClipboardError::LegacyCopy("mock copy command failed".into()))
        } else {
            Ok(())
        }
    }

    fn detach(&mut self, _id: SurfaceId) {
        self.record(SurfaceCall::Detach);
    }
}
