//! Type annotations and parameters

use super::expression::Expression;

/// A type annotation: a name, optional bracketed arguments, optional default
///
/// The name is whatever the source spelled: a dotted name (`np.ndarray`), a C
/// type (`unsigned long`, `char*`), a quoted forward reference, or a slice
/// shorthand inside brackets (`:`, `::1`).
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub name: String,
    pub arguments: Vec<TypeExpr>,
    pub default: Option<Expression>,
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            default: None,
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<TypeExpr>) -> Self {
        self.arguments = arguments;
        self
    }
}

/// A function parameter
///
/// When the annotation carried a default (`x: int = 5` parsed inside the type) and
/// the parameter itself has none, the default is moved onto the parameter, so a
/// parameter default always lives in `default`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub annotation: Option<TypeExpr>,
    pub default: Option<Expression>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, annotation: Option<TypeExpr>, default: Option<Expression>) -> Self {
        let mut annotation = annotation;
        let default = match default {
            Some(default) => Some(default),
            None => annotation.as_mut().and_then(|ty| ty.default.take()),
        };
        Self {
            name: name.into(),
            annotation,
            default,
        }
    }

    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, None, None)
    }
}
