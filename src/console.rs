//! The verbosity-controlled output channel
//!
//! Everything a build shows its user (dry-run trace lines, script `println`
//! output, task messages, failure diagnostics) is written through a
//! [`Console`]. Hosts swap the sink to capture output, and bootstrap code
//! silences it for a scope with [`Console::suppress`].

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use crate::core::models::Verbosity;
use crate::state;

type Sink = Rc<RefCell<Box<dyn Write>>>;

/// Shared handle to the output sink of a run
///
/// Clones write to the same sink.
#[derive(Clone)]
pub struct Console {
    sink: Sink,
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Console {
    /// Console writing to standard output
    #[must_use]
    pub fn stdout() -> Self {
        Self::from_writer(io::stdout())
    }

    /// Console writing to an arbitrary writer
    #[must_use]
    pub fn from_writer(writer: impl Write + 'static) -> Self {
        Self {
            sink: Rc::new(RefCell::new(Box::new(writer))),
        }
    }

    /// Console writing into an in-memory buffer, plus a handle to read it
    #[must_use]
    pub fn capture() -> (Self, Captured) {
        let captured = Captured::default();
        (Self::from_writer(captured.clone()), captured)
    }

    /// Write text as-is, regardless of verbosity
    pub fn print(&self, text: &str) {
        let mut sink = self.sink.borrow_mut();
        if let Err(e) = sink.write_all(text.as_bytes()).and_then(|()| sink.flush()) {
            log::warn!("console write failed: {e}");
        }
    }

    /// Write a line, regardless of verbosity
    pub fn println(&self, text: &str) {
        self.print(&format!("{text}\n"));
    }

    /// Write a line if the current verbosity admits `priority`
    pub fn message(&self, priority: Verbosity, text: &str) {
        if state::verbosity().admits(priority) {
            self.println(text);
        }
    }

    /// Replace the sink with a discarding one until the guard drops
    ///
    /// The previous sink is restored on every exit path, unwinding included.
    #[must_use = "output is only suppressed while the guard is alive"]
    pub fn suppress(&self) -> Suppressed<'_> {
        let saved = std::mem::replace(&mut *self.sink.borrow_mut(), Box::new(io::sink()));
        Suppressed {
            console: self,
            saved: Some(saved),
        }
    }
}

/// Guard returned by [`Console::suppress`]
pub struct Suppressed<'a> {
    console: &'a Console,
    saved: Option<Box<dyn Write>>,
}

impl fmt::Debug for Suppressed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suppressed").finish_non_exhaustive()
    }
}

impl Drop for Suppressed<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            *self.console.sink.borrow_mut() = saved;
        }
    }
}

/// In-memory sink shared with a [`Console`]
#[derive(Debug, Clone, Default)]
pub struct Captured {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl Captured {
    /// Everything written so far, lossily decoded
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.borrow()).replace('\r', "")
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
