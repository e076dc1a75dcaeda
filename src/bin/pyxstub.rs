//! Command-line interface for pyxstub
//! Renders `.pyi` stubs for the named source files.
//!
//! Usage:
//!   pyxstub `<files>...` [--config `<file>`] [--indent `<str>`] [--line-width `<n>`] [--stdout] [--report text|json]
//!
//! Unparsed remainders are reported on stderr as warnings; the exit status is
//! non-zero only when a file cannot be read or written, or the configuration
//! cannot be loaded.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use pyxstub::pyx::config::Loader;
use pyxstub::pyx::processor::{process_file, write_stub, FileStub, ProcessingError};
use pyxstub::StubConfig;
use std::path::{Path, PathBuf};

fn main() {
    let matches = Command::new("pyxstub")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate .pyi stubs from Cython and Python sources")
        .arg_required_else_help(true)
        .arg(
            Arg::new("files")
                .help("Source files to render")
                .required(true)
                .num_args(1..)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML settings layered over the defaults")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .help("Indentation unit used in stubs"),
        )
        .arg(
            Arg::new("line-width")
                .long("line-width")
                .help("Parameter lists longer than this are wrapped")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("stdout")
                .long("stdout")
                .help("Print stubs instead of writing .pyi files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .help("Format of unparsed-text warnings")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .get_matches();

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let to_stdout = matches.get_flag("stdout");
    let json_reports = matches.get_one::<String>("report").map(String::as_str) == Some("json");

    let mut failed = false;
    for path in matches.get_many::<PathBuf>("files").into_iter().flatten() {
        match handle_file(path, &config, to_stdout) {
            Ok(stub) => report_unparsed(&stub, json_reports),
            Err(e) => {
                eprintln!("Error: {}", e);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}

/// Defaults, then the optional settings file, then command-line overrides
fn load_config(matches: &ArgMatches) -> Result<StubConfig, ProcessingError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }
    if let Some(indent) = matches.get_one::<String>("indent") {
        loader = loader.set_override("indent", indent.as_str())?;
    }
    if let Some(width) = matches.get_one::<u32>("line-width") {
        loader = loader.set_override("line_width", i64::from(*width))?;
    }
    let settings = loader.build()?;
    Ok(StubConfig::from_settings(&settings))
}

fn handle_file(path: &Path, config: &StubConfig, to_stdout: bool) -> Result<FileStub, ProcessingError> {
    let stub = process_file(path, config)?;
    if to_stdout {
        print!("{}", stub.stub);
    } else {
        write_stub(&stub)?;
    }
    Ok(stub)
}

fn report_unparsed(stub: &FileStub, json: bool) {
    let Some(report) = &stub.report else {
        return;
    };
    if json {
        match serde_json::to_string(report) {
            Ok(line) => eprintln!("{}", line),
            Err(e) => eprintln!("Error serializing report: {}", e),
        }
    } else {
        eprintln!("Warning: {}", report);
    }
}
