//! The vocabulary of the upstream event stream: the declarations, declaration contexts and
//! types a clang-based front end reports for one translation unit, in source order.
//!
//! Declarations are identified by clang's own node ids (`"0x55d0c..."` in `-ast-dump=json`
//! output), so the same declaration seen twice compares equal.

pub mod decls;
pub mod types;

pub use decls::{BaseSpec, Decl, DeclContext, DeclKind, Field};
pub use types::{CanonicalType, TemplateArgument};

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Identity of a declaration node in the clang AST.
pub type DeclRef = clang_ast::Id;

/// Parses a clang node id such as `0x1a2b`.
pub fn decl_ref(text: &str) -> Result<DeclRef, serde_json::Error> {
    serde_json::from_value(serde_json::Value::String(text.into()))
}

/// The kind of lexical frame an `EnterScope` event opens.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    Namespace,
    Class,
    Function,
    Block,
    Template,
}

/// One step of the traversal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Opens a frame. `context` is the declaration context the frame is the body of, if any.
    EnterScope {
        frame: FrameKind,
        #[serde(default)]
        context: Option<DeclContext>,
        #[serde(default)]
        label: Option<String>,
    },
    /// Closes the innermost frame, which must be of kind `frame`.
    LeaveScope { frame: FrameKind },
    Decl { decl: Decl },
    /// A type used by an expression (a cast, `sizeof`, `new`, ...).
    Type { ty: CanonicalType },
}

/// An error returned while loading an event stream.
#[derive(Debug, Error)]
pub enum EventStreamError {
    #[error("failed to read event stream: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed event stream: {0}")]
    Json(#[from] serde_json::Error),
}

/// The ordered events of one translation unit.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventStream {
    pub events: Vec<Event>,
}

impl EventStream {
    /// Reads a JSON array of events.
    pub fn from_reader(reader: impl Read) -> Result<EventStream, EventStreamError> {
        let stream: EventStream = serde_json::de::from_reader(reader)?;
        debug!("Loaded {} events", stream.events.len());
        Ok(stream)
    }

    pub fn from_path(path: &Path) -> Result<EventStream, EventStreamError> {
        EventStream::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl IntoIterator for EventStream {
    type Item = Event;
    type IntoIter = std::vec::IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl FromIterator<Event> for EventStream {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        EventStream {
            events: iter.into_iter().collect(),
        }
    }
}
