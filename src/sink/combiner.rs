//! Fans one record out to several sinks. A failing sink never stops the others from
//! receiving the record, and never disappears from the error either.

use super::Sink;
use crate::Error;
use std::fmt;

/// One sink's share of a combined failure.
#[derive(Debug)]
pub struct SinkFailure {
    /// Position of the sink in registration order.
    pub index: usize,
    pub sink: String,
    pub error: Error,
}

impl fmt::Display for SinkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sink #{} ({}): {}", self.index, self.sink, self.error)
    }
}

/// N sinks presented as one, written sequentially in registration order.
#[derive(Default)]
pub struct SinkCombiner {
    sinks: Vec<Box<dyn Sink>>,
}

impl fmt::Debug for SinkCombiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.sinks.iter().map(|s| s.name()))
            .finish()
    }
}

impl SinkCombiner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: impl Sink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    #[must_use]
    pub fn with(mut self, sink: impl Sink + 'static) -> Self {
        self.push(sink);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Sink names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    fn each(&self, op: impl Fn(&dyn Sink) -> Result<(), Error>) -> Result<(), Error> {
        let failures: Vec<SinkFailure> = self
            .sinks
            .iter()
            .enumerate()
            .filter_map(|(index, sink)| {
                op(sink.as_ref()).err().map(|error| SinkFailure {
                    index,
                    sink: sink.name().to_string(),
                    error,
                })
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Sinks(failures))
        }
    }
}

impl Sink for SinkCombiner {
    fn name(&self) -> &str {
        "combined"
    }

    fn write(&self, bytes: &[u8]) -> Result<(), Error> {
        self.each(|sink| sink.write(bytes))
    }

    fn flush(&self) -> Result<(), Error> {
        self.each(|sink| sink.flush())
    }
}
