//! Shared pieces of the xir pipeline: the run configuration, the `Representation` trait that
//! every materializable result implements, logging setup, and test utilities.

pub mod config;
pub mod logging;
pub mod test_util;

use std::fmt::Display;
use std::path::Path;

/// A result of the pipeline that can be written to disk, such as the interned IR of one
/// translation unit.
pub trait Representation: Display {
    /// This representation's name. Should be snake case, as it is used to create file names.
    fn name(&self) -> &'static str;

    /// Writes this representation to `path`.
    fn materialize(&self, path: &Path) -> std::io::Result<()>;
}
