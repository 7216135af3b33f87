//! Operation generation engine.
//!
//! Turns [`OpSpec`] blocks into concrete, uniquely numbered JSON operation
//! records:
//! - literal commands are minified and re-indexed ([`reindex_literal`])
//! - synthesized operations are produced by an [`OpSynthesizer`] looked up by
//!   operation type in an [`OpRegistry`]
//!
//! Every emitted record consumes one id from the [`SequenceCounter`] carried in
//! the [`GenContext`], which lives for exactly one patron.

mod expand;
mod insert;
mod literal;
mod range;
mod value;

pub use expand::expand_op;
pub use insert::InsertSynthesizer;
pub use literal::{command_text, reindex_literal, strip_whitespace};
pub use range::normalize_range;
pub use value::{random_string, ValueGen};

use crate::config::OpSpec;
use rand::rngs::StdRng;
use std::collections::BTreeMap;

/// Error taxonomy for workload generation
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// Malformed configuration
    #[error("config error: {0}")]
    Config(String),

    /// No synthesizer registered for the operation type
    #[error("unknown operation type: {0:?}")]
    UnknownOperation(String),

    /// A synthesizer failed internally
    #[error("generation failed: {0}")]
    Generation(String),

    /// Writing the output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-patron record id sequence. The first id handed out is 1.
#[derive(Debug, Default, Clone)]
pub struct SequenceCounter {
    current: u64,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment and return the new id.
    pub fn advance(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    /// Last id handed out (0 if none yet).
    pub fn current(&self) -> u64 {
        self.current
    }
}

/// State threaded through one patron's generation.
pub struct GenContext<'a> {
    pub rng: &'a mut StdRng,
    pub seq: SequenceCounter,
}

impl<'a> GenContext<'a> {
    pub fn new(rng: &'a mut StdRng) -> Self {
        Self {
            rng,
            seq: SequenceCounter::new(),
        }
    }
}

/// Produces one JSON-encoded operation record from an [`OpSpec`].
pub trait OpSynthesizer {
    fn synthesize(&self, spec: &OpSpec, ctx: &mut GenContext<'_>) -> Result<String, GenError>;
}

impl<F> OpSynthesizer for F
where
    F: Fn(&OpSpec, &mut GenContext<'_>) -> Result<String, GenError>,
{
    fn synthesize(&self, spec: &OpSpec, ctx: &mut GenContext<'_>) -> Result<String, GenError> {
        self(spec, ctx)
    }
}

/// Operation-type name to synthesizer mapping.
pub struct OpRegistry {
    handlers: BTreeMap<String, Box<dyn OpSynthesizer>>,
}

impl OpRegistry {
    /// Registry with no handlers.
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Register (or replace) the handler for `name`.
    pub fn register<S>(&mut self, name: impl Into<String>, handler: S)
    where
        S: OpSynthesizer + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    pub fn with<S>(mut self, name: impl Into<String>, handler: S) -> Self
    where
        S: OpSynthesizer + 'static,
    {
        self.register(name, handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn OpSynthesizer> {
        self.handlers.get(name).map(|h| h.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered operation types, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }
}

impl Default for OpRegistry {
    fn default() -> Self {
        Self::empty().with("insert", InsertSynthesizer)
    }
}
