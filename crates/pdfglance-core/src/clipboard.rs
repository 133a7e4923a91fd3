//! Clipboard export: a primary system clipboard, and a legacy fallback that
//! copies through a transient surface.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write denied: {0}")]
    Denied(String),
    #[error("legacy copy failed: {0}")]
    LegacyCopy(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The primary clipboard write path.
pub trait PrimaryClipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard via `arboard`.
///
/// The handle is created lazily and kept alive: on X11 and Wayland the
/// selection is only served while the owning `Clipboard` exists.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Mutex<Option<arboard::Clipboard>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrimaryClipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| ClipboardError::Unavailable("clipboard lock poisoned".into()))?;

        if guard.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            *guard = Some(clipboard);
        }

        match guard.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::Denied(e.to_string())),
            None => Err(ClipboardError::Unavailable("no clipboard".into())),
        }
    }
}

/// Identifier of a surface attached to a [`SurfaceHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// Something that can hold a temporary editable text surface and run the
/// legacy copy command on its selection.
pub trait SurfaceHost: Send {
    fn attach(&mut self, text: &str) -> SurfaceId;
    fn select_all(&mut self, id: SurfaceId);
    fn exec_copy(&mut self, id: SurfaceId) -> Result<(), ClipboardError>;
    fn detach(&mut self, id: SurfaceId);
}

/// A surface attached for the lifetime of this guard. Dropping it detaches
/// the surface, whatever happened in between.
pub struct TransientSurface<'h> {
    host: &'h mut dyn SurfaceHost,
    id: SurfaceId,
}

impl<'h> TransientSurface<'h> {
    pub fn acquire(host: &'h mut dyn SurfaceHost, text: &str) -> Self {
        let id = host.attach(text);
        Self { host, id }
    }

    pub fn select_all(&mut self) {
        self.host.select_all(self.id);
    }

    pub fn exec_copy(&mut self) -> Result<(), ClipboardError> {
        self.host.exec_copy(self.id)
    }
}

impl Drop for TransientSurface<'_> {
    fn drop(&mut self) {
        self.host.detach(self.id);
    }
}

/// Copy `text` through a transient surface on `host`.
pub fn fallback_copy(host: &mut dyn SurfaceHost, text: &str) -> Result<(), ClipboardError> {
    let mut surface = TransientSurface::acquire(host, text);
    surface.select_all();
    surface.exec_copy()
}

/// Terminal surface host: copies the selection with an OSC 52 escape
/// sequence. Works in Ghostty, iTerm2, kitty, WezTerm, and most modern
/// terminals.
pub struct Osc52Host<W: Write + Send> {
    out: W,
    next_id: u64,
    surfaces: HashMap<SurfaceId, (String, bool)>,
}

impl Osc52Host<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> Osc52Host<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            next_id: 0,
            surfaces: HashMap::new(),
        }
    }

    /// Number of surfaces currently attached.
    pub fn attached(&self) -> usize {
        self.surfaces.len()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> SurfaceHost for Osc52Host<W> {
    fn attach(&mut self, text: &str) -> SurfaceId {
        self.next_id += 1;
        let id = SurfaceId(self.next_id);
        self.surfaces.insert(id, (text.to_string(), false));
        id
    }

    fn select_all(&mut self, id: SurfaceId) {
        if let Some((_, selected)) = self.surfaces.get_mut(&id) {
            *selected = true;
        }
    }

    fn exec_copy(&mut self, id: SurfaceId) -> Result<(), ClipboardError> {
        use base64::Engine;

        let text = match self.surfaces.get(&id) {
            Some((text, true)) => text,
            Some((_, false)) => return Err(ClipboardError::LegacyCopy("nothing selected".into())),
            None => return Err(ClipboardError::LegacyCopy("surface not attached".into())),
        };
        let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
        // Bypasses any terminal backend buffer.
        self.out
            .write_all(format!("\x1b]52;c;{}\x07", encoded).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn detach(&mut self, id: SurfaceId) {
        self.surfaces.remove(&id);
    }
}
