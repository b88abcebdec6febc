//! Collaborator traits implemented by the host engine.

use std::io;
use std::path::Path;

/// Where finished demos are persisted.
///
/// The recorder only needs to know whether a candidate file name is
/// taken and to write the finished buffer in one blocking call.
pub trait DemoStorage {
    /// Whether a file already exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Write `bytes` to `path`, replacing any previous content.
    fn write(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// Produces the engine's demo footer.
///
/// Called once when recording stops, after the end marker has been
/// written. The footer's content is opaque to the recorder.
pub trait FooterWriter {
    /// Append the footer bytes to `out`.
    fn write_footer(&mut self, out: &mut Vec<u8>);
}

impl<F: FnMut(&mut Vec<u8>)> FooterWriter for F {
    fn write_footer(&mut self, out: &mut Vec<u8>) {
        self(out)
    }
}
