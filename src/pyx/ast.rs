//! AST for the declarations the stub engine understands
//!
//! Only the parts of a declaration that survive into a stub are modelled:
//! headers, parameter lists, types, defaults and docstrings. Bodies are reduced
//! to nested declarations (for classes) or to verbatim lines (for enums and
//! dataclasses, whose stub is the body itself).

pub mod construct;
pub mod expression;
pub mod position;
pub mod span;
pub mod types;

pub use construct::{
    Class, ClassHeader, Construct, ConstructKind, DataClass, Docstring, EnumClass, Function,
    FunctionHeader, Import, ImportName, Struct, StructField, TypedClass, TypedFunction,
    TypedFunctionKind,
};
pub use expression::{BinaryOp, Expression, Literal};
pub use position::SourceLocation;
pub use span::{Position, Span};
pub use types::{Parameter, TypeExpr};
