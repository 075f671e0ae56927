use c_ast::FrameKind;
use thiserror::Error;

/// A broken contract between the event producer and the interner. These are never caused by
/// the translation unit's contents, only by a malformed event sequence.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum InternError {
    #[error("leave_scope({found:?}) with no open frame")]
    PopWithoutFrame { found: FrameKind },
    #[error("leave_scope({found:?}) while the innermost open frame is {expected:?}")]
    FrameMismatch {
        expected: FrameKind,
        found: FrameKind,
    },
    #[error("translation unit ended with {0} open frame(s)")]
    UnclosedFrames(usize),
}
