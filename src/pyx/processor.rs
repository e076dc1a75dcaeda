//! Stub rendering entry points and file processing
//!
//! [`render_stub`] and [`render_stub_with`] are the pure core: text in, stub and
//! unparsed remainder out, no I/O and no failure mode. The file-level helpers
//! below wrap them for callers that work with paths:
//!
//! ```rust,ignore
//! use pyxstub::pyx::processor::{process_file, write_stub};
//!
//! let stub = process_file("module.pyx", &StubConfig::default())?;
//! if let Some(report) = &stub.report {
//!     eprintln!("{}", report);
//! }
//! write_stub(&stub)?;
//! ```

use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::pyx::ast::SourceLocation;
use crate::pyx::config::StubConfig;
use crate::pyx::formats::StubWriter;
use crate::pyx::parser::scan;
use crate::pyx::unparsed::remainder;

/// Result of rendering one source text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StubOutput {
    /// Rendered stub text
    pub stub: String,
    /// Input text not covered by any recognized construct, trimmed
    pub unparsed: String,
    /// Byte offset of the first unparsed character
    pub anchor: Option<usize>,
}

/// Render `source` with the default configuration
pub fn render_stub(source: &str) -> StubOutput {
    render_stub_with(source, &StubConfig::default())
}

/// Render `source` with an explicit configuration
pub fn render_stub_with(source: &str, config: &StubConfig) -> StubOutput {
    let scanned = scan(source);
    let stub = StubWriter::new(config).render_all(scanned.iter().map(|item| &item.construct));
    let spans: Vec<_> = scanned.iter().map(|item| item.span).collect();
    let remainder = remainder(source, &spans);

    StubOutput {
        stub,
        unparsed: remainder.text,
        anchor: remainder.anchor,
    }
}

/// Errors from the file-level helpers
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("{} is not valid UTF-8", path.display())]
    UnsupportedInput { path: PathBuf },
}

/// Diagnostic for a file with an unparsed remainder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub path: String,
    /// 1-based line of the first unparsed character
    pub line: usize,
    /// 1-based column of the first unparsed character
    pub column: usize,
    pub anchor: usize,
    pub text: String,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: unparsed text left out of the stub:\n{}",
            self.path, self.line, self.column, self.text
        )
    }
}

/// A rendered source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStub {
    pub source_path: PathBuf,
    pub stub_path: PathBuf,
    pub stub: String,
    pub report: Option<Report>,
}

/// The `.pyi` path that belongs next to a source file
pub fn stub_path(path: impl AsRef<Path>) -> PathBuf {
    path.as_ref().with_extension("pyi")
}

/// Render already loaded source text; `path` only names the file in reports
pub fn process_source(path: impl AsRef<Path>, source: &str, config: &StubConfig) -> FileStub {
    let path = path.as_ref();
    let output = render_stub_with(source, config);

    let report = match output.anchor {
        Some(anchor) if !output.unparsed.is_empty() => {
            let position = SourceLocation::new(source).byte_to_position(anchor);
            let report = Report {
                path: path.display().to_string(),
                line: position.line + 1,
                column: position.column + 1,
                anchor,
                text: output.unparsed,
            };
            warn!(
                path = %report.path,
                line = report.line,
                column = report.column,
                anchor = report.anchor,
                "unparsed source left out of stub"
            );
            Some(report)
        }
        _ => None,
    };

    FileStub {
        source_path: path.to_path_buf(),
        stub_path: stub_path(path),
        stub: output.stub,
        report,
    }
}

/// Read and render a source file
pub fn process_file(path: impl AsRef<Path>, config: &StubConfig) -> Result<FileStub, ProcessingError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| ProcessingError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let source = String::from_utf8(bytes).map_err(|_| ProcessingError::UnsupportedInput {
        path: path.to_path_buf(),
    })?;
    Ok(process_source(path, &source, config))
}

/// Write a rendered stub to its `.pyi` path
pub fn write_stub(stub: &FileStub) -> Result<(), ProcessingError> {
    fs::write(&stub.stub_path, &stub.stub).map_err(|source| ProcessingError::Io {
        path: stub.stub_path.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_path() {
        assert_eq!(stub_path("pkg/module.pyx"), PathBuf::from("pkg/module.pyi"));
        assert_eq!(stub_path("module.py"), PathBuf::from("module.pyi"));
    }

    #[test]
    fn test_render_stub_plain_function() {
        let output = render_stub("def add(a: int, b: int = 0) -> int:\n    return a + b\n");
        assert_eq!(output.stub, "def add(a: int, b: int=0) -> int:\n    ...\n");
        assert_eq!(output.unparsed, "");
        assert_eq!(output.anchor, None);
    }

    #[test]
    fn test_render_stub_of_nothing() {
        assert_eq!(render_stub(""), StubOutput::default());
    }

    #[test]
    fn test_process_source_reports_position() {
        let source = "def a():\n    pass\n\nx = = 1\n\ndef b():\n    pass\n";
        let stub = process_source("mod.pyx", source, &StubConfig::default());
        let report = stub.report.expect("remainder should be reported");
        assert_eq!(report.text, "x = = 1");
        assert_eq!((report.line, report.column), (4, 1));
        assert_eq!(report.anchor, 19);
        assert_eq!(stub.stub_path, PathBuf::from("mod.pyi"));
    }

    #[test]
    fn test_process_and_write_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("shapes.pyx");
        fs::write(&path, "cdef class Shape:\n    cpdef double area(self):\n        return 0\n")
            .expect("write source");

        let stub = process_file(&path, &StubConfig::default()).expect("file to process");
        assert!(stub.report.is_none());
        write_stub(&stub).expect("stub to write");

        let written = fs::read_to_string(dir.path().join("shapes.pyi")).expect("stub to exist");
        assert_eq!(written, "class Shape:\n    def area(self) -> double:\n        ...\n");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = process_file(dir.path().join("missing.pyx"), &StubConfig::default());
        assert!(matches!(result, Err(ProcessingError::Io { .. })));
    }

    #[test]
    fn test_non_utf8_is_unsupported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("binary.pyx");
        fs::write(&path, [0xff, 0xfe, 0x00]).expect("write bytes");
        let result = process_file(&path, &StubConfig::default());
        assert!(matches!(result, Err(ProcessingError::UnsupportedInput { .. })));
    }

    #[test]
    fn test_report_serializes() {
        let report = Report {
            path: "a.pyx".into(),
            line: 2,
            column: 1,
            anchor: 5,
            text: "junk".into(),
        };
        let json = serde_json::to_value(&report).expect("report to serialize");
        assert_eq!(json["line"], 2);
        assert_eq!(json["text"], "junk");
    }
}
