//! Type annotations, parameters and C-style declarators

use chumsky::prelude::*;

use crate::pyx::ast::{Expression, Parameter, TypeExpr};
use crate::pyx::lexer::{Token, TokenSpan};
use crate::pyx::parser::combinators::{
    followed_by, lead, not_followed_by, padded, token, word, ws, ws1, ParserError,
};
use crate::pyx::parser::expressions::expression;

/// Qualifiers that may precede the type of a `cdef`/`cpdef` function
const QUALIFIERS: &[&str] = &["inline", "public", "api", "static", "readonly", "extern"];

/// Slice shorthand inside brackets: `:`, `::1`, `:1:2`
fn slice_shorthand() -> impl Parser<TokenSpan, String, Error = ParserError> + Clone {
    token(Token::Colon)
        .ignore_then(
            filter_map(|span, (tok, range): TokenSpan| match tok {
                Token::Colon => Ok(":".to_string()),
                Token::Int(digits) => Ok(digits),
                tok => Err(ParserError::expected_input_found(span, None, Some((tok, range)))),
            })
            .repeated(),
        )
        .then_ignore(followed_by(lead(token(Token::Comma).or(token(Token::RBracket)))))
        .map(|rest: Vec<String>| format!(":{}", rest.concat()))
}

fn quoted_name() -> impl Parser<TokenSpan, String, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Str(text) => Ok(text),
        tok => Err(ParserError::expected_input_found(span, None, Some((tok, range)))),
    })
}

/// `= expr` directly after a type, unless the expression closes the parameter list
///
/// `x: int = 0)` leaves the default to the parameter; the type default only
/// sticks when more parameters follow.
fn type_default() -> impl Parser<TokenSpan, Expression, Error = ParserError> + Clone {
    lead(token(Token::Equals))
        .ignore_then(lead(expression()))
        .then_ignore(not_followed_by(lead(token(Token::RParen))))
}

/// A type annotation: `name`, `name[args]`, optionally `= default`
pub(crate) fn type_expression() -> impl Parser<TokenSpan, TypeExpr, Error = ParserError> + Clone {
    recursive(|ty| {
        let name = choice((slice_shorthand(), word(), quoted_name()));

        let arguments = padded(ty)
            .separated_by(token(Token::Comma))
            .allow_trailing()
            .then_ignore(ws())
            .delimited_by(token(Token::LBracket), token(Token::RBracket));

        name.then(lead(arguments).or_not())
            .then(type_default().or_not())
            .map(|((name, arguments), default)| TypeExpr {
                name,
                arguments: arguments.unwrap_or_default(),
                default,
            })
    })
}

/// Whitespace-separated type segments, as in `unsigned long long total`
pub(crate) fn declarator_segments() -> impl Parser<TokenSpan, Vec<TypeExpr>, Error = ParserError> + Clone {
    type_expression()
        .then(ws1().ignore_then(type_expression()).repeated())
        .map(|(first, mut rest)| {
            rest.insert(0, first);
            rest
        })
}

/// A C-style declarator split into its type and the declared name
pub(crate) struct Declarator {
    pub declared_type: Option<TypeExpr>,
    pub name: String,
    pub default: Option<Expression>,
}

/// Split segments into type and name: the last segment names the declaration,
/// everything before it is the type
///
/// Multi-word types keep the bracketed arguments of their last word:
/// `const double[:] data` declares `data` of type `const double[:]`.
pub(crate) fn split_declarator(mut segments: Vec<TypeExpr>) -> Option<Declarator> {
    let last = segments.pop()?;
    let declared_type = match segments.len() {
        0 => None,
        1 => segments.pop(),
        _ => {
            let arguments = segments
                .last_mut()
                .map(|ty| std::mem::take(&mut ty.arguments))
                .unwrap_or_default();
            let name = segments
                .iter()
                .map(|ty| ty.name.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            Some(TypeExpr::named(name).with_arguments(arguments))
        }
    };
    Some(Declarator {
        declared_type,
        name: last.name,
        default: last.default,
    })
}

/// Drop leading storage/linkage qualifiers from a declarator's segments
pub(crate) fn strip_qualifiers(segments: Vec<TypeExpr>) -> Vec<TypeExpr> {
    let keep_from = segments
        .iter()
        .position(|ty| !(ty.arguments.is_empty() && QUALIFIERS.contains(&ty.name.as_str())))
        .unwrap_or(segments.len());
    segments.into_iter().skip(keep_from).collect()
}

fn parameter_default() -> impl Parser<TokenSpan, Expression, Error = ParserError> + Clone {
    lead(token(Token::Equals)).ignore_then(lead(expression()))
}

/// Named-first parameter: `name[: type][= default]`
pub(crate) fn named_parameter() -> impl Parser<TokenSpan, Parameter, Error = ParserError> + Clone {
    word()
        .then(lead(token(Token::Colon)).ignore_then(lead(type_expression())).or_not())
        .then(parameter_default().or_not())
        .map(|((name, annotation), default)| Parameter::new(name, annotation, default))
}

/// Typed-first parameter: `type name[= default]`, or a bare `name[= default]`
pub(crate) fn typed_parameter() -> impl Parser<TokenSpan, Parameter, Error = ParserError> + Clone {
    declarator_segments()
        .then(parameter_default().or_not())
        .try_map(|(segments, default), span| {
            let declarator = split_declarator(segments)
                .ok_or_else(|| ParserError::custom(span, "empty parameter declarator"))?;
            Ok(Parameter::new(
                declarator.name,
                declarator.declared_type,
                default.or(declarator.default),
            ))
        })
}

/// One parameter in either dialect
///
/// The named-first form only wins when a separator or the closing paren follows,
/// so `int x` falls through to the typed-first form.
pub(crate) fn parameter() -> impl Parser<TokenSpan, Parameter, Error = ParserError> + Clone {
    named_parameter()
        .then_ignore(followed_by(lead(token(Token::Comma).or(token(Token::RParen)))))
        .or(typed_parameter())
}

/// A parenthesized, comma-separated parameter list; a trailing comma is allowed
pub(crate) fn parameter_list() -> impl Parser<TokenSpan, Vec<Parameter>, Error = ParserError> + Clone {
    padded(parameter())
        .separated_by(token(Token::Comma))
        .allow_trailing()
        .then_ignore(ws())
        .delimited_by(token(Token::LParen), token(Token::RParen))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pyx::testing::run_parser;

    fn ty(source: &str) -> TypeExpr {
        run_parser(type_expression(), source).expect("type should parse")
    }

    fn params(source: &str) -> Vec<Parameter> {
        run_parser(parameter_list(), source).expect("parameters should parse")
    }

    #[test]
    fn test_simple_types() {
        assert_eq!(ty("int"), TypeExpr::named("int"));
        assert_eq!(ty("np.ndarray"), TypeExpr::named("np.ndarray"));
        assert_eq!(ty("char*"), TypeExpr::named("char*"));
        assert_eq!(ty("'Node'"), TypeExpr::named("'Node'"));
    }

    #[test]
    fn test_nested_arguments() {
        assert_eq!(
            ty("Dict[str, List[int]]"),
            TypeExpr::named("Dict").with_arguments(vec![
                TypeExpr::named("str"),
                TypeExpr::named("List").with_arguments(vec![TypeExpr::named("int")]),
            ])
        );
    }

    #[test]
    fn test_slice_shorthand() {
        assert_eq!(
            ty("double[:, ::1]"),
            TypeExpr::named("double")
                .with_arguments(vec![TypeExpr::named(":"), TypeExpr::named("::1")])
        );
    }

    #[test]
    fn test_named_first_parameters() {
        assert_eq!(
            params("(a: int, b: int = 0)"),
            vec![
                Parameter::new("a", Some(TypeExpr::named("int")), None),
                Parameter::new("b", Some(TypeExpr::named("int")), Some(Expression::int("0"))),
            ]
        );
    }

    #[test]
    fn test_type_default_before_more_parameters() {
        let parsed = params("(a: int = 1, b=2)");
        assert_eq!(parsed[0].default, Some(Expression::int("1")));
        assert_eq!(parsed[0].annotation, Some(TypeExpr::named("int")));
        assert_eq!(parsed[1], Parameter::new("b", None, Some(Expression::int("2"))));
    }

    #[test]
    fn test_typed_first_parameters() {
        assert_eq!(
            params("(self, int x, unsigned long n = 5, double[:] data)"),
            vec![
                Parameter::bare("self"),
                Parameter::new("x", Some(TypeExpr::named("int")), None),
                Parameter::new(
                    "n",
                    Some(TypeExpr::named("unsigned long")),
                    Some(Expression::int("5"))
                ),
                Parameter::new(
                    "data",
                    Some(TypeExpr::named("double").with_arguments(vec![TypeExpr::named(":")])),
                    None
                ),
            ]
        );
    }

    #[test]
    fn test_star_parameters_and_trailing_comma() {
        assert_eq!(
            params("(\n    *args,\n    **kwargs,\n)"),
            vec![Parameter::bare("*args"), Parameter::bare("**kwargs")]
        );
    }

    #[test]
    fn test_strip_qualifiers() {
        let segments = vec![
            TypeExpr::named("inline"),
            TypeExpr::named("int"),
            TypeExpr::named("f"),
        ];
        let stripped = strip_qualifiers(segments);
        assert_eq!(stripped, vec![TypeExpr::named("int"), TypeExpr::named("f")]);
    }
}
