//! Place to put utilities that are only used by tests.

use crate::Representation;
use std::path::Path;

/// Returns a new temporary directory. Unlike the defaults in the `tempdir` and `tempfile` crates,
/// this directory is not world-accessible by default.
#[cfg(not(miri))]
pub fn tempdir() -> std::io::Result<tempfile::TempDir> {
    use std::fs::Permissions;
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(Permissions::from_mode(0o700));
    }
    builder.tempdir()
}

/// A representation that writes a fixed string, for testing code that materializes results.
pub struct MockRepresentation(pub &'static str);

impl Representation for MockRepresentation {
    fn name(&self) -> &'static str {
        "mock_representation"
    }

    fn materialize(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.0)
    }
}

impl std::fmt::Display for MockRepresentation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "MockRepresentation")
    }
}

#[cfg(all(test, not(miri)))]
mod tests {
    use super::*;

    #[test]
    fn tempdir_is_private() -> std::io::Result<()> {
        let dir = tempdir()?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(dir.path())?.permissions().mode();
            assert_eq!(mode & 0o077, 0);
        }
        let path = dir.path().join("out.txt");
        MockRepresentation("hello").materialize(&path)?;
        assert_eq!(std::fs::read_to_string(path)?, "hello");
        Ok(())
    }
}
