//! Formatted trace output for kernel state transitions.

use std::fmt;
use std::io::{self, Write};

/// Switch and destination for the kernel's state-transition trace.
///
/// Every line carries the simulation time in a fixed-width prefix so traces
/// line up column-wise. Write failures are deliberately ignored; the trace
/// is fire-and-forget diagnostics, not part of the simulation semantics.
pub(crate) struct Tracer {
    enabled: bool,
    sink: Box<dyn Write>,
}

impl Tracer {
    pub fn new() -> Self {
        Tracer {
            enabled: false,
            sink: Box::new(io::stdout()),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, on: bool) {
        self.enabled = on;
    }

    pub fn set_sink(&mut self, sink: Box<dyn Write>) {
        self.sink = sink;
    }

    pub fn sink_mut(&mut self) -> &mut dyn Write {
        &mut *self.sink
    }

    /// Emits one trace line, if tracing is on.
    pub fn msg(&mut self, clock: f64, args: fmt::Arguments<'_>) {
        if self.enabled {
            let _ = writeln!(self.sink, "At time {clock:12.3} -- {args}");
        }
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
