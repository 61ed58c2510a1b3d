//! Shared test utilities for the xattr-view workspace.
//!
//! Extended attribute tests need a mount that accepts `user.` attributes.
//! Build hosts vary (tmpfs before 6.6, overlay roots, some container
//! sandboxes), so tests probe first and skip when support is missing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};

use tempfile::TempDir;

const PROBE_NAME: &str = "user.test_support";

/// Reports whether `path` accepts a `user.` attribute write.
///
/// Writes and immediately removes a throwaway attribute.
#[cfg(unix)]
pub fn xattrs_supported(path: &Path) -> bool {
    match xattr::set(path, PROBE_NAME, b"test") {
        Ok(()) => {
            let _ = xattr::remove(path, PROBE_NAME);
            true
        }
        Err(_) => false,
    }
}

/// Extended attributes are never available off Unix.
#[cfg(not(unix))]
pub fn xattrs_supported(_path: &Path) -> bool {
    false
}

/// A scratch directory holding one regular file.
pub struct ScratchFile {
    dir: TempDir,
    path: PathBuf,
}

impl ScratchFile {
    /// Returns the scratch file's path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the directory holding the scratch file.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Reports whether the scratch file's mount supports `user.` attributes.
    pub fn supports_xattrs(&self) -> bool {
        xattrs_supported(&self.path)
    }
}

/// Creates a temporary directory containing a file called `name`.
pub fn scratch_file(name: &str) -> ScratchFile {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, b"scratch").expect("write scratch file");
    ScratchFile { dir, path }
}

/// Installs a test-friendly `tracing` subscriber once per process.
///
/// Honours `RUST_LOG`, defaulting to `xattr_view=debug`; output goes through
/// the test harness writer so it only shows for failing tests.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("xattr_view=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Runs `f` under a thread-local subscriber and returns the events it emitted.
///
/// Every level is recorded and the output is plain text, one event per line.
pub fn capture_events(f: impl FnOnce()) -> String {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::util::SubscriberInitExt;

    let buffer = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&buffer);
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_ansi(false)
        .with_writer(move || CapturedWriter(Arc::clone(&sink)))
        .finish();
    {
        let _guard = subscriber.set_default();
        f();
    }

    let bytes = buffer.lock().expect("capture buffer poisoned");
    String::from_utf8_lossy(&bytes).into_owned()
}

struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .expect("capture buffer poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
