//! Fixed configuration handed to a listener at construction.
//!
//! [`ListenerConfig`] bundles the output sink, the base directory used to
//! relativise source paths, the styling table and the snippet builder.

use std::{
    collections::HashMap,
    fmt,
    io::Write,
    path::{Component, Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use tracing::warn;

use crate::{
    model::SourceLocation,
    snippet::{SnippetBuilder, SyntaxSnippetBuilder},
    status::Status,
};

/// Destination for rendered report text.
pub trait ReportSink: Send {
    /// Append `text` to the output.
    fn write(&mut self, text: &str);
}

/// In-memory sink whose contents remain readable through any clone.
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer(Arc<Mutex<String>>);

impl SharedBuffer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Snapshot of everything written so far.
    #[must_use]
    pub fn contents(&self) -> String {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ReportSink for SharedBuffer {
    fn write(&mut self, text: &str) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(text);
    }
}

/// Sink forwarding to any [`std::io::Write`] implementation.
///
/// Write errors are logged and dropped so a broken pipe cannot abort a run.
pub struct WriterSink<W>(W);

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self { Self(writer) }
}

impl<W: Write + Send> ReportSink for WriterSink<W> {
    fn write(&mut self, text: &str) {
        if let Err(error) = self.0.write_all(text.as_bytes()).and_then(|()| self.0.flush()) {
            warn!(%error, "failed to write report output");
        }
    }
}

/// Key into a [`StyleTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleKey {
    Status(Status),
    Bold,
    Location,
}

impl From<Status> for StyleKey {
    fn from(status: Status) -> Self { StyleKey::Status(status) }
}

/// Function decorating a piece of report text.
pub type StyleFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Styling functions keyed by status, plus bold and location styles.
///
/// Keys without a registered function render text unchanged.
#[derive(Clone, Default)]
pub struct StyleTable {
    styles: HashMap<StyleKey, StyleFn>,
}

impl StyleTable {
    /// A table that leaves all text unchanged.
    #[must_use]
    pub fn plain() -> Self { Self::default() }

    /// A table using ANSI escape sequences.
    #[must_use]
    pub fn ansi() -> Self {
        [
            (StyleKey::Status(Status::Failed), "31"),
            (StyleKey::Status(Status::Ambiguous), "35"),
            (StyleKey::Status(Status::Undefined), "33"),
            (StyleKey::Status(Status::Pending), "33"),
            (StyleKey::Status(Status::Skipped), "36"),
            (StyleKey::Status(Status::Passed), "32"),
            (StyleKey::Bold, "1"),
            (StyleKey::Location, "90"),
        ]
        .into_iter()
        .fold(Self::plain(), |table, (key, code)| {
            table.with_style(key, move |text: &str| format!("\x1b[{code}m{text}\x1b[0m"))
        })
    }

    /// Register `style` for `key`, replacing any previous function.
    #[must_use]
    pub fn with_style<F>(mut self, key: impl Into<StyleKey>, style: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.styles.insert(key.into(), Arc::new(style));
        self
    }

    /// Apply the style registered for `key` to `text`.
    #[must_use]
    pub fn apply(&self, key: impl Into<StyleKey>, text: &str) -> String {
        match self.styles.get(&key.into()) {
            Some(style) => style(text),
            None => text.to_owned(),
        }
    }
}

impl fmt::Debug for StyleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleTable")
            .field("keys", &self.styles.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Configuration shared by listener implementations.
pub struct ListenerConfig {
    pub(crate) sink: Box<dyn ReportSink>,
    pub(crate) base_dir: PathBuf,
    pub(crate) styles: StyleTable,
    pub(crate) snippet_builder: Arc<dyn SnippetBuilder>,
}

impl ListenerConfig {
    /// Configuration writing to `sink`, relative to the current directory,
    /// with plain styles and the default snippet builder.
    pub fn new(sink: impl ReportSink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
            base_dir: std::env::current_dir().unwrap_or_default(),
            styles: StyleTable::plain(),
            snippet_builder: Arc::new(SyntaxSnippetBuilder),
        }
    }

    /// Directory source paths are shown relative to.
    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    #[must_use]
    pub fn with_styles(mut self, styles: StyleTable) -> Self {
        self.styles = styles;
        self
    }

    #[must_use]
    pub fn with_snippet_builder(mut self, builder: impl SnippetBuilder + 'static) -> Self {
        self.snippet_builder = Arc::new(builder);
        self
    }

    #[must_use]
    pub fn styles(&self) -> &StyleTable { &self.styles }

    /// `<path relative to base dir>:<line>`.
    #[must_use]
    pub fn format_location(&self, location: &SourceLocation) -> String {
        format!(
            "{}:{}",
            relative_path(&location.file, &self.base_dir).display(),
            location.line
        )
    }

    pub(crate) fn write(&mut self, text: &str) { self.sink.write(text); }
}

impl fmt::Debug for ListenerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerConfig")
            .field("base_dir", &self.base_dir)
            .field("styles", &self.styles)
            .finish_non_exhaustive()
    }
}

/// Express `path` relative to `base`, walking up with `..` where needed.
///
/// Relative inputs on either side are resolved against the current directory
/// first.
fn relative_path(path: &Path, base: &Path) -> PathBuf {
    let path = absolute_lexical(path);
    let base = absolute_lexical(base);
    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();
    let shared = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();
    let mut relative = PathBuf::new();
    for _ in shared..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[shared..] {
        relative.push(part.as_os_str());
    }
    relative
}

/// Absolute form of `path` with `.` and `..` folded away, without touching
/// the filesystem.
fn absolute_lexical(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalised = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalised.pop();
            }
            other => normalised.push(other.as_os_str()),
        }
    }
    normalised
}
