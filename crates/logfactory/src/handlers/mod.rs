//! Output handlers attached to loggers

mod traits;
mod null;
mod stream;
pub mod file;

pub use traits::{report_error, Handler, HandlerKind, HandlerState, SharedHandler};
pub use null::NullHandler;
pub use stream::{StreamHandler, StreamTarget};
pub use file::{FileHandler, FileHandlerOptions, FileMode};

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{self, Write};
    use std::sync::Arc;

    use parking_lot::Mutex;

    /// In-memory writer whose clones share one buffer
    #[derive(Debug, Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
