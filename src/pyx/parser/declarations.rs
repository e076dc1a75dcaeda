//! Declaration headers and the constructs built from them

use chumsky::prelude::*;
use std::sync::Arc;

use crate::pyx::ast::{
    Class, ClassHeader, Construct, DataClass, EnumClass, Function, FunctionHeader, Struct,
    StructField, TypedClass, TypedFunction, TypedFunctionKind,
};
use crate::pyx::lexer::{Token, TokenSpan};
use crate::pyx::parser::blocks::{docstring, raw_suite, suite};
use crate::pyx::parser::combinators::{
    balanced_group, lead, line_end, padded, source_text, token, word, ws, ParserError,
};
use crate::pyx::parser::types::{
    declarator_segments, parameter_list, split_declarator, strip_qualifiers, type_expression,
};

/// `def name(params) [-> type]:`
pub(crate) fn function_header() -> impl Parser<TokenSpan, FunctionHeader, Error = ParserError> + Clone {
    token(Token::Def)
        .ignore_then(lead(word()))
        .then(lead(parameter_list()))
        .then(
            lead(token(Token::Arrow))
                .ignore_then(lead(type_expression()))
                .or_not(),
        )
        .then_ignore(lead(token(Token::Colon)))
        .map(|((name, parameters), returns)| FunctionHeader {
            name,
            parameters,
            returns,
        })
}

/// Modifiers between the parameter list and the colon (`nogil`, `except -1`,
/// `except? 0`, `with gil`, ...); they do not appear in stubs
fn trailing_modifiers() -> impl Parser<TokenSpan, (), Error = ParserError> + Clone {
    filter(|(tok, _): &TokenSpan| {
        matches!(
            tok,
            Token::Whitespace
                | Token::Name(_)
                | Token::Int(_)
                | Token::Star
                | Token::Minus
                | Token::Plus
                | Token::Symbol(_)
        )
    })
    .repeated()
    .ignored()
}

/// `cpdef|cdef [qualifiers] [type] name(params) [modifiers]:`
///
/// The declarator before the parameter list is split so its last segment is the
/// function name; anything before it (after qualifiers) is the return type.
pub(crate) fn typed_function_header(
) -> impl Parser<TokenSpan, (TypedFunctionKind, FunctionHeader), Error = ParserError> + Clone {
    let kind = token(Token::Cpdef)
        .to(TypedFunctionKind::Checked)
        .or(token(Token::Cdef).to(TypedFunctionKind::Unchecked));

    kind.then(lead(declarator_segments()))
        .then(lead(parameter_list()))
        .then_ignore(trailing_modifiers())
        .then_ignore(lead(token(Token::Colon)))
        .try_map(|((kind, segments), parameters), span| {
            let declarator = split_declarator(strip_qualifiers(segments))
                .ok_or_else(|| ParserError::custom(span, "typed function without a name"))?;
            // `int *f(...)` returns `int*`
            let name = declarator.name.trim_start_matches('*');
            let pointer = &declarator.name[..declarator.name.len() - name.len()];
            let returns = declarator.declared_type.map(|mut returns| {
                returns.name.push_str(pointer);
                returns
            });
            Ok((
                kind,
                FunctionHeader {
                    name: name.to_string(),
                    parameters,
                    returns,
                },
            ))
        })
}

fn class_parents() -> impl Parser<TokenSpan, Vec<String>, Error = ParserError> + Clone {
    padded(word())
        .separated_by(token(Token::Comma))
        .allow_trailing()
        .then_ignore(ws())
        .delimited_by(token(Token::LParen), token(Token::RParen))
}

/// `class name[(parents)]:`
pub(crate) fn class_header() -> impl Parser<TokenSpan, ClassHeader, Error = ParserError> + Clone {
    token(Token::Class)
        .ignore_then(lead(word()))
        .then(lead(class_parents()).or_not())
        .then_ignore(lead(token(Token::Colon)))
        .map(|(name, parents)| ClassHeader {
            name,
            parents: parents.unwrap_or_default(),
        })
}

pub(crate) fn function<M>(members: M) -> impl Parser<TokenSpan, Construct, Error = ParserError> + Clone
where
    M: Parser<TokenSpan, Vec<Construct>, Error = ParserError> + Clone,
{
    function_header()
        .then(suite(members))
        .map(|(header, suite)| {
            Construct::Function(Function {
                header,
                docstring: suite.docstring,
            })
        })
}

pub(crate) fn typed_function<M>(members: M) -> impl Parser<TokenSpan, Construct, Error = ParserError> + Clone
where
    M: Parser<TokenSpan, Vec<Construct>, Error = ParserError> + Clone,
{
    typed_function_header()
        .then(suite(members))
        .map(|((kind, header), suite)| {
            Construct::TypedFunction(TypedFunction {
                kind,
                header,
                docstring: suite.docstring,
            })
        })
}

pub(crate) fn class<M>(members: M) -> impl Parser<TokenSpan, Construct, Error = ParserError> + Clone
where
    M: Parser<TokenSpan, Vec<Construct>, Error = ParserError> + Clone,
{
    class_header()
        .then(suite(members))
        .map(|(header, suite)| {
            Construct::Class(Class {
                header,
                docstring: suite.docstring,
                members: suite.members,
            })
        })
}

/// A class with `Enum` among its parents; the body is kept verbatim
pub(crate) fn enum_class(source: Arc<String>) -> impl Parser<TokenSpan, Construct, Error = ParserError> + Clone {
    class_header()
        .try_map(|header, span| {
            if header.parents.iter().any(|parent| parent == "Enum") {
                Ok(header)
            } else {
                Err(ParserError::custom(span, "not an Enum subclass"))
            }
        })
        .then(raw_suite(source))
        .map(|(header, suite)| {
            Construct::EnumClass(EnumClass {
                header,
                docstring: suite.docstring,
                lines: suite.lines,
            })
        })
}

/// `cdef class name[(parents)]:`
pub(crate) fn typed_class<M>(members: M) -> impl Parser<TokenSpan, Construct, Error = ParserError> + Clone
where
    M: Parser<TokenSpan, Vec<Construct>, Error = ParserError> + Clone,
{
    token(Token::Cdef)
        .ignore_then(lead(class_header()))
        .then(suite(members))
        .map(|(header, suite)| {
            Construct::TypedClass(TypedClass {
                header,
                docstring: suite.docstring,
                members: suite.members,
            })
        })
}

/// `type name[, name...]` on a line of its own
fn struct_field_line() -> impl Parser<TokenSpan, Vec<StructField>, Error = ParserError> + Clone {
    declarator_segments()
        .then(
            padded(token(Token::Comma))
                .ignore_then(word())
                .repeated(),
        )
        .then_ignore(line_end())
        .try_map(|(segments, extra_names), span| {
            let declarator = split_declarator(segments)
                .ok_or_else(|| ParserError::custom(span.clone(), "empty field"))?;
            let field_type = declarator
                .declared_type
                .ok_or_else(|| ParserError::custom(span, "struct field without a type"))?;
            let mut fields = vec![StructField {
                name: declarator.name,
                field_type: field_type.clone(),
            }];
            fields.extend(extra_names.into_iter().map(|name| StructField {
                name,
                field_type: field_type.clone(),
            }));
            Ok(fields)
        })
}

/// `cdef struct name:` followed by an indented block of field lines
pub(crate) fn structure() -> impl Parser<TokenSpan, Construct, Error = ParserError> + Clone {
    let body = line_end()
        .ignore_then(token(Token::Indent))
        .ignore_then(docstring().then_ignore(line_end()).or_not())
        .then(struct_field_line().repeated())
        .then_ignore(token(Token::Dedent));

    token(Token::Cdef)
        .ignore_then(lead(token(Token::Struct)))
        .ignore_then(lead(word()))
        .then_ignore(lead(token(Token::Colon)))
        .then(body)
        .map(|(name, (docstring, lines))| {
            Construct::Struct(Struct {
                name,
                docstring,
                fields: lines.into_iter().flatten().collect(),
            })
        })
}

/// `@...dataclass[(args)]` then a class whose body is kept verbatim
pub(crate) fn dataclass(source: Arc<String>) -> impl Parser<TokenSpan, Construct, Error = ParserError> + Clone {
    let decorator_source = source.clone();
    let decorator = token(Token::At)
        .ignore_then(word().try_map(|name, span| {
            if name.ends_with("dataclass") {
                Ok(name)
            } else {
                Err(ParserError::custom(span, "not a dataclass decorator"))
            }
        }))
        .ignore_then(balanced_group().or_not())
        .map(move |group| group.map(|ranges| source_text(&decorator_source, &ranges)))
        .then_ignore(ws())
        .then_ignore(token(Token::Newline).or_not())
        .then_ignore(ws());

    decorator
        .then(class_header())
        .then(raw_suite(source))
        .map(|((decorator_arguments, header), suite)| {
            Construct::DataClass(DataClass {
                decorator_arguments,
                header,
                docstring: suite.docstring,
                lines: suite.lines,
            })
        })
}

/// Declarations that may appear both at top level and inside class bodies
///
/// Data classes and imports are top level only.
pub(crate) fn member_construct<M>(
    members: M,
    source: Arc<String>,
) -> impl Parser<TokenSpan, Construct, Error = ParserError> + Clone
where
    M: Parser<TokenSpan, Vec<Construct>, Error = ParserError> + Clone,
{
    choice((
        enum_class(source.clone()),
        class(members.clone()),
        function(members.clone()),
        typed_function(members.clone()),
        typed_class(members),
        structure(),
    ))
}
