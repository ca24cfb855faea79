use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::Level;

/// Log sink shared by every writer the subscriber creates.
#[derive(Clone, Debug, Default)]
pub struct LogTarget {
    file: Option<Arc<Mutex<File>>>,
}

impl LogTarget {
    /// Write to stderr.
    pub fn stderr() -> Self {
        Self::default()
    }

    /// Append to the file at `path`, creating it if needed.
    pub fn file(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Some(Arc::new(Mutex::new(file))),
        })
    }
}

pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    File(Arc<Mutex<File>>),
    Stderr(io::Stderr),
}

impl DelegatingWriter {
    fn new(target: &LogTarget) -> Self {
        if let Some(file) = &target.file {
            DelegatingWriter {
                inner: DelegatingInner::File(Arc::clone(file)),
            }
        } else {
            DelegatingWriter {
                inner: DelegatingInner::Stderr(io::stderr()),
            }
        }
    }
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::File(f) => f
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .write(buf),
            DelegatingInner::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::File(f) => f
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .flush(),
            DelegatingInner::Stderr(s) => s.flush(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SubscriberMakeWriter {
    target: LogTarget,
}

impl SubscriberMakeWriter {
    pub fn new(target: LogTarget) -> Self {
        Self { target }
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DelegatingWriter::new(&self.target)
    }
}

/// Initialize the tracing subscriber on stderr. Safe to call multiple times;
/// subsequent calls are no-ops for the global subscriber.
pub fn init_default() {
    init_with_writer(LogTarget::stderr());
}

/// Initialize the tracing subscriber writing to `target`. A terminal UI owns
/// stdout/stderr, so interactive programs should pass a log file.
pub fn init_with_writer(target: LogTarget) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(SubscriberMakeWriter::new(target))
        .with_target(false)
        .with_thread_names(false)
        .with_ansi(false)
        .try_init();
}
