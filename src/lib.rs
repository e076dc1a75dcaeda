//! # pyxstub
//!
//! Interface stub extraction for Cython-flavoured Python sources.
//!
//! The engine scans `.pyx`/`.py` text for declarations (functions, `cpdef`/`cdef`
//! functions, classes, `cdef class`es, structs, dataclasses and imports) and renders
//! them as `.pyi` stub text: headers and docstrings are kept, bodies become `...`.
//! Anything the grammar does not recognize is skipped and handed back as an
//! "unparsed" remainder for diagnostics.
//!
//! ```text
//! let output = pyxstub::render_stub("def add(a: int, b: int = 0) -> int:\n    return a + b\n");
//! assert_eq!(output.stub, "def add(a: int, b: int=0) -> int:\n    ...\n");
//! assert!(output.unparsed.is_empty());
//! ```

pub mod pyx;

pub use pyx::config::{StubConfig, StubSettings};
pub use pyx::processor::{render_stub, render_stub_with, StubOutput};
