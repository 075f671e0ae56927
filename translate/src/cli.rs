//! The command-line arguments and configuration system for [crate::translate] and the
//! `translate` binary.

use clap::{Parser, ValueEnum};
use config::FileFormat::Toml;
use directories::ProjectDirs;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;
use xir_core::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    C,
    #[value(alias = "c++")]
    Cxx,
}

/// Command-line arguments for the `translate` binary.
#[derive(Debug, Parser)]
pub struct Args {
    /// Set a configuration value; format $NAME=$VALUE.
    #[arg(long, short)]
    pub config: Vec<String>,

    /// Erase the output directory if nonempty.
    #[arg(long, short)]
    pub force: bool,

    /// Path to the JSON event stream of the translation unit.
    // Should always be present unless using a flag like --print-config-path
    pub input: Option<PathBuf>,

    /// Prints out the location of the config file.
    #[arg(long)]
    pub print_config_path: bool,

    /// Path to the output directory for the IR and the reconstructed declarations.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Language the declarations are reconstructed in.
    #[arg(long, value_enum)]
    pub language: Option<LanguageArg>,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(long, short)]
    pub verbose: bool,
}

/// Logs a warning for every field in `unknown`.
///
/// `prefix` should be the path to this entry (e.g. the `synthesis` table should call this with a
/// `prefix` of `synthesis`).
pub(crate) fn unknown_field_warning(prefix: &str, unknown: &HashMap<String, Value>) {
    let mut entries: Vec<_> = unknown.keys().collect();
    entries.sort_unstable();
    entries.into_iter().for_each(|name| match prefix {
        "" => warn!("Unknown config key {name}"),
        p => warn!("Unknown config key {p}.{name}"),
    });
}

/// Performs parsing and validation of the config; to be called by main() before executing any code
/// that tries to retrieve the config.
///
/// Returns the config, or None if a command line flag that calls for an early exit (such as
/// --print-config-path) was provided.
pub fn initialize(args: &Args) -> Result<Option<Config>, Box<dyn std::error::Error>> {
    let dirs = ProjectDirs::from("", "", "xir").ok_or("no home directory")?;
    if args.print_config_path {
        println!("Config file location: {:?}", config_file(dirs.config_dir()));
        return Ok(None);
    }
    let config = load_config(args, dirs.config_dir())?;
    unknown_field_warning("", &config.unknown);
    config.validate()?;
    Ok(Some(config))
}

fn load_config(args: &Args, config_dir: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let mut settings = config::Config::builder()
        .add_source(config::File::from_str(
            include_str!("../default_config.toml"),
            Toml,
        ))
        .add_source(config::File::from(config_file(config_dir)).required(false))
        .add_source(config::File::from(PathBuf::from("config.toml")).required(false));
    for config_arg in &args.config {
        let Some((name, value)) = config_arg.split_once('=') else {
            return Err(format!("failed to parse config value {config_arg:?}; no '=' found").into());
        };
        settings = settings.set_override(name, value)?;
    }

    if args.force {
        settings = settings.set_override("force", "true")?;
    }

    // The config crate does not support providing a Path in an override, and converting to a
    // string and back can be lossy. Instead, this sets a blank value and corrects it after
    // deserialization.
    if args.input.is_some() {
        settings = settings.set_override("input", " ")?;
    }
    if args.output.is_some() {
        settings = settings.set_override("output", " ")?;
    }

    if let Some(language) = args.language {
        let language = match language {
            LanguageArg::C => "c",
            LanguageArg::Cxx => "cxx",
        };
        settings = settings.set_override("language", language)?;
    }

    let mut config: Config = settings.build()?.try_deserialize()?;
    if let Some(ref input) = args.input {
        config.input = input.clone();
    }
    if let Some(ref output) = args.output {
        config.output = output.clone();
    }
    Ok(config)
}

/// Returns the config file path, given the config directory.
fn config_file(config_dir: &Path) -> PathBuf {
    [config_dir, "translate.toml".as_ref()].iter().collect()
}

#[cfg(test)]
mod tests {
    #[cfg(not(miri))]
    #[test]
    fn load_config_test() {
        use super::*;
        use std::{fs, io::Write as _};
        use xir_core::config::Language;
        use xir_core::test_util::tempdir;
        let config_dir = tempdir().unwrap();

        assert_eq!(
            load_config(
                &Args::parse_from(["", "a.json", "--output=/tmp/out"]),
                config_dir.path(),
            )
            .unwrap()
            .input,
            AsRef::<Path>::as_ref("a.json")
        );

        fs::File::create(config_file(config_dir.path()))
            .unwrap()
            .write_all(
                br#"
                    input = "b.json"
                    language = "c"
                    [synthesis]
                    incomplete_type = "__incomplete"
                "#,
            )
            .unwrap();
        let from_file = load_config(
            &Args::parse_from(["", "--output=/tmp/out"]),
            config_dir.path(),
        )
        .unwrap();
        assert_eq!(from_file.input, AsRef::<Path>::as_ref("b.json"));
        assert_eq!(from_file.language, Language::C);
        assert_eq!(from_file.synthesis.incomplete_type, "__incomplete");
        // Keys missing from the file keep their defaults.
        assert_eq!(from_file.synthesis.unsupported_type, "UNSUPPORTED_TYPE");

        // Verify the --config flag overrides the user's config file.
        assert_eq!(
            load_config(
                &Args::parse_from(["", "--config", "input=c.json", "--output=/tmp/out"]),
                config_dir.path()
            )
            .unwrap()
            .input,
            AsRef::<Path>::as_ref("c.json")
        );
        // Verify the positional input overrides all the configuration options.
        assert_eq!(
            load_config(
                &Args::parse_from(["", "--config", "input=d", "d.json", "--output=/tmp/out"]),
                config_dir.path()
            )
            .unwrap()
            .input,
            AsRef::<Path>::as_ref("d.json")
        );
        // Verify --language overrides the file.
        assert_eq!(
            load_config(
                &Args::parse_from(["", "--language", "cxx", "--output=/tmp/out"]),
                config_dir.path()
            )
            .unwrap()
            .language,
            Language::Cxx
        );
        // Verify --force enables the force option.
        assert!(
            load_config(
                &Args::parse_from(["", "--force", "--output=/tmp/out"]),
                config_dir.path()
            )
            .unwrap()
            .force
        );
        assert!(load_config(&Args::parse_from(["", "--config", "force"]), config_dir.path()).is_err());
    }
}
