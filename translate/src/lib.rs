//! Interns the event stream of one C/C++ translation unit into the xir IR and reconstructs its
//! declarations. This is normally used through the `translate` binary, but is exposed as a
//! library crate as well.

pub mod cli;
mod emit;

pub use emit::Declarations;

use c_ast::EventStream;
use interner::intern_events;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use xir_core::Representation;
use xir_core::config::Config;
use xir_ir::TranslationUnit;

/// An error in the setup of a run, before any event is interned.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("no input event stream given")]
    MissingInput,
    #[error("no output directory given")]
    MissingOutput,
    #[error("output directory {0} is not empty (pass --force to erase it)")]
    OutputNotEmpty(String),
}

/// Performs the complete run: loads the events, interns them, and writes the IR and the
/// reconstructed declarations into the output directory.
pub fn translate(config: Arc<Config>) -> Result<TranslationUnit, Box<dyn std::error::Error>> {
    config.validate()?;
    if config.input.as_os_str().is_empty() {
        return Err(TranslateError::MissingInput.into());
    }
    prepare_output(&config.output, config.force)?;

    let events = EventStream::from_path(&config.input)?;
    info!(
        "Interning {} events from {}",
        events.len(),
        config.input.display()
    );
    let unit = intern_events(config.clone(), events)?;
    for problem in unit.problems() {
        warn!("Inconsistent IR: {problem}");
    }
    write(&config.output, &unit)?;

    let declarations = Declarations::render(&config, &unit)?;
    write_as(&config.output, declarations.file_name(), &declarations)?;
    Ok(unit)
}

/// Makes sure `output` exists and is empty, erasing it first if `force` is set.
fn prepare_output(output: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if output.as_os_str().is_empty() {
        return Err(TranslateError::MissingOutput.into());
    }
    if output.exists() && fs::read_dir(output)?.next().is_some() {
        if !force {
            return Err(TranslateError::OutputNotEmpty(output.display().to_string()).into());
        }
        warn!("Erasing output directory {}", output.display());
        fs::remove_dir_all(output)?;
    }
    fs::create_dir_all(output)?;
    Ok(())
}

fn write(dir: &Path, representation: &dyn Representation) -> std::io::Result<()> {
    write_as(dir, &format!("{}.json", representation.name()), representation)
}

fn write_as(dir: &Path, file_name: &str, representation: &dyn Representation) -> std::io::Result<()> {
    let path = dir.join(file_name);
    representation.materialize(&path)?;
    info!("Wrote {} to {}", representation.name(), path.display());
    Ok(())
}

#[cfg(all(test, not(miri)))]
mod tests {
    use super::*;
    use xir_core::test_util::tempdir;

    const EVENTS: &str = r#"[
        { "event": "decl", "decl": {
            "id": "0x20", "name": "Node",
            "kind": { "kind": "record", "tag": "struct", "members": [
                { "name": "next", "ty": { "kind": "pointer", "pointee": {
                    "kind": "record", "decl": "0x20", "tag": "struct", "name": "Node" } } } ] } } },
        { "event": "decl", "decl": {
            "id": "0x21", "name": "head",
            "kind": { "kind": "var", "ty": { "kind": "pointer", "pointee": {
                "kind": "record", "decl": "0x20", "tag": "struct", "name": "Node" } } } } }
    ]"#;

    fn config_for(dir: &Path) -> Config {
        let input = dir.join("events.json");
        fs::write(&input, EVENTS).unwrap();
        Config {
            input,
            output: dir.join("out"),
            ..Config::mock()
        }
    }

    #[test]
    fn writes_ir_and_declarations() {
        let dir = tempdir().unwrap();
        let config = Arc::new(config_for(dir.path()));
        let unit = translate(config.clone()).unwrap();
        assert!(unit.problems().is_empty());

        let ir: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(config.output.join("xcodeml_ir.json")).unwrap())
                .unwrap();
        assert!(ir["types"].is_array());
        assert_eq!(
            fs::read_to_string(config.output.join("declarations.cpp")).unwrap(),
            "struct Node { struct Node *next; };\nstruct Node *head;\n"
        );
    }

    #[test]
    fn refuses_nonempty_output_without_force() {
        let dir = tempdir().unwrap();
        let mut config = config_for(dir.path());
        fs::create_dir_all(&config.output).unwrap();
        fs::write(config.output.join("stale.txt"), "stale").unwrap();

        let error = translate(Arc::new(Config {
            input: config.input.clone(),
            output: config.output.clone(),
            ..Config::mock()
        }))
        .unwrap_err();
        assert!(error.to_string().contains("not empty"));

        config.force = true;
        let output = config.output.clone();
        translate(Arc::new(config)).unwrap();
        assert!(!output.join("stale.txt").exists());
        assert!(output.join("xcodeml_ir.json").exists());
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempdir().unwrap();
        let config = Config {
            input: "".into(),
            output: dir.path().join("out"),
            ..Config::mock()
        };
        assert!(translate(Arc::new(config)).is_err());
    }
}
