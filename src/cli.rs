use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// File name suffixes bundled when `--include` is not given.
pub const DEFAULT_INCLUDE_SUFFIXES: [&str; 2] = [".ts", ".vue"];

/// Exclusion globs applied when `--exclude` is not given, matched against
/// root-relative paths.
pub const DEFAULT_EXCLUDE_GLOBS: [&str; 10] = [
    "*.pdea*",
    "*node_modules*",
    "*types.d.ts",
    "*.nuxt*",
    "*.json",
    "*pnpm-lock.yaml",
    "*.ico",
    "*.md",
    "*api/models*",
    "*docs*",
];

/// Force-include globs applied when `--force-include` is not given; a match
/// overrides any exclusion.
pub const DEFAULT_FORCE_INCLUDE_GLOBS: [&str; 1] = ["**habits**"];

/// Default bundle file name.
pub const DEFAULT_OUTPUT_FILE: &str = "project.txt";

/// Fixed input file name the restore tool reads.
pub const DEFAULT_INPUT_FILE: &str = "input.txt";

pub struct BundleConfig {
    pub root: PathBuf,
    pub output_path: PathBuf,
    pub include_suffixes: Vec<String>,
    pub exclude_globs: Vec<String>,
    pub force_include_globs: Vec<String>,
}

impl BundleConfig {
    /// A config with the stock filter lists, writing the bundle into `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let output_path = root.join(DEFAULT_OUTPUT_FILE);
        Self {
            root,
            output_path,
            include_suffixes: to_strings(&DEFAULT_INCLUDE_SUFFIXES),
            exclude_globs: to_strings(&DEFAULT_EXCLUDE_GLOBS),
            force_include_globs: to_strings(&DEFAULT_FORCE_INCLUDE_GLOBS),
        }
    }
}

pub fn parse_args() -> Result<(BundleConfig, u8)> {
    let matches = Command::new("src2prompt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Bundles matching source files into a single annotated text file")
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Sets the bundle output path")
                .default_value(DEFAULT_OUTPUT_FILE)
                .num_args(1),
        )
        .arg(
            Arg::new("include")
                .long("include")
                .value_name("SUFFIX")
                .help("File name suffixes to bundle; pass no values to admit every file")
                .num_args(0..)
                .default_values(DEFAULT_INCLUDE_SUFFIXES),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .value_name("GLOB")
                .help("Glob patterns to leave out, matched against relative paths")
                .num_args(0..)
                .default_values(DEFAULT_EXCLUDE_GLOBS),
        )
        .arg(
            Arg::new("force-include")
                .long("force-include")
                .value_name("GLOB")
                .help("Glob patterns bundled even when excluded")
                .num_args(0..)
                .default_values(DEFAULT_FORCE_INCLUDE_GLOBS),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increases log detail; repeat for more")
                .action(ArgAction::Count),
        )
        .get_matches();

    let root = std::env::current_dir()?;

    let output_path = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE));

    let config = BundleConfig {
        root,
        output_path,
        include_suffixes: collect_values(&matches, "include"),
        exclude_globs: collect_values(&matches, "exclude"),
        force_include_globs: collect_values(&matches, "force-include"),
    };

    Ok((config, matches.get_count("verbose")))
}

/// Maps `-v` counts onto env_logger defaults: warnings only, then info,
/// then debug. `RUST_LOG` still overrides.
pub fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn collect_values(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default()
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
