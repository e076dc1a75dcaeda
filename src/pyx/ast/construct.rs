//! Recognized declarations

use super::types::{Parameter, TypeExpr};
use std::fmt;

/// A triple-quoted docstring: string prefix (`r`, `u`, ...) and the raw text
/// between the quotes
#[derive(Debug, Clone, PartialEq)]
pub struct Docstring {
    pub prefix: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionHeader {
    pub name: String,
    pub parameters: Vec<Parameter>,
    /// Return annotation for `def`, type prefix for `cpdef`/`cdef`
    pub returns: Option<TypeExpr>,
}

/// `def name(params) [-> type]:`
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub header: FunctionHeader,
    pub docstring: Option<Docstring>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedFunctionKind {
    /// `cpdef`: callable from Python, exposed in stubs
    Checked,
    /// `cdef`: C-level only
    Unchecked,
}

/// `cpdef|cdef [qualifiers] [type] name(params) [modifiers]:`
#[derive(Debug, Clone, PartialEq)]
pub struct TypedFunction {
    pub kind: TypedFunctionKind,
    pub header: FunctionHeader,
    pub docstring: Option<Docstring>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassHeader {
    pub name: String,
    pub parents: Vec<String>,
}

/// `class name[(parents)]:`
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub header: ClassHeader,
    pub docstring: Option<Docstring>,
    pub members: Vec<Construct>,
}

/// `cdef class name[(parents)]:`
#[derive(Debug, Clone, PartialEq)]
pub struct TypedClass {
    pub header: ClassHeader,
    pub docstring: Option<Docstring>,
    pub members: Vec<Construct>,
}

/// A class deriving from `Enum`; its body lines are kept verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct EnumClass {
    pub header: ClassHeader,
    pub docstring: Option<Docstring>,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: String,
    pub field_type: TypeExpr,
}

/// `cdef struct name:` with one typed field declaration per line
#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    pub name: String,
    pub docstring: Option<Docstring>,
    pub fields: Vec<StructField>,
}

/// `@dataclass[(args)]` followed by a class; the body is kept verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct DataClass {
    /// Raw decorator argument text including parentheses
    pub decorator_arguments: Option<String>,
    pub header: ClassHeader,
    pub docstring: Option<Docstring>,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportName {
    pub name: String,
    pub alias: Option<String>,
}

impl ImportName {
    pub fn new(name: impl Into<String>, alias: Option<String>) -> Self {
        Self {
            name: name.into(),
            alias,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Import {
    /// `import a, b as c`
    Plain(Vec<ImportName>),
    /// `from module import a, b as c`
    From {
        module: String,
        names: Vec<ImportName>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Construct {
    /// Consecutive import statements
    ImportSection(Vec<Import>),
    Function(Function),
    TypedFunction(TypedFunction),
    Class(Class),
    TypedClass(TypedClass),
    EnumClass(EnumClass),
    Struct(Struct),
    DataClass(DataClass),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructKind {
    ImportSection,
    Function,
    TypedFunction,
    Class,
    TypedClass,
    EnumClass,
    Struct,
    DataClass,
}

impl Construct {
    pub fn kind(&self) -> ConstructKind {
        match self {
            Construct::ImportSection(_) => ConstructKind::ImportSection,
            Construct::Function(_) => ConstructKind::Function,
            Construct::TypedFunction(_) => ConstructKind::TypedFunction,
            Construct::Class(_) => ConstructKind::Class,
            Construct::TypedClass(_) => ConstructKind::TypedClass,
            Construct::EnumClass(_) => ConstructKind::EnumClass,
            Construct::Struct(_) => ConstructKind::Struct,
            Construct::DataClass(_) => ConstructKind::DataClass,
        }
    }

    /// Declared name, if the construct has one
    pub fn name(&self) -> Option<&str> {
        match self {
            Construct::ImportSection(_) => None,
            Construct::Function(function) => Some(&function.header.name),
            Construct::TypedFunction(function) => Some(&function.header.name),
            Construct::Class(class) => Some(&class.header.name),
            Construct::TypedClass(class) => Some(&class.header.name),
            Construct::EnumClass(class) => Some(&class.header.name),
            Construct::Struct(structure) => Some(&structure.name),
            Construct::DataClass(class) => Some(&class.header.name),
        }
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConstructKind::ImportSection => "imports",
            ConstructKind::Function => "def",
            ConstructKind::TypedFunction => "typed def",
            ConstructKind::Class => "class",
            ConstructKind::TypedClass => "cdef class",
            ConstructKind::EnumClass => "enum",
            ConstructKind::Struct => "struct",
            ConstructKind::DataClass => "dataclass",
        };
        write!(f, "{}", label)
    }
}
