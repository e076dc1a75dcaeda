//! Default-value expressions
//!
//! Atoms are tried in this order: list, parenthesized/tuple, dict, set,
//! constructor call, literal, symbol. Calls come before symbols so `Foo(1)` is
//! not read as the symbol `Foo` followed by junk. Binary operators fold left,
//! with `*` and `/` binding tighter than `+` and `-`.

use chumsky::prelude::*;

use crate::pyx::ast::{BinaryOp, Expression, Literal};
use crate::pyx::lexer::{Token, TokenSpan};
use crate::pyx::parser::combinators::{lead, not_followed_by, padded, token, ws, ParserError};

/// A dotted run of names and digits, such as `np.float64` or `MAX_SIZE`
pub(crate) fn symbol() -> impl Parser<TokenSpan, String, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Name(text) | Token::Int(text) | Token::Float(text) => Ok(text),
        Token::Dot => Ok(".".to_string()),
        tok => Err(ParserError::expected_input_found(span, None, Some((tok, range)))),
    })
    .repeated()
    .at_least(1)
    .map(|pieces: Vec<String>| pieces.concat())
}

fn sign() -> impl Parser<TokenSpan, &'static str, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Plus => Ok("+"),
        Token::Minus => Ok("-"),
        tok => Err(ParserError::expected_input_found(span, None, Some((tok, range)))),
    })
}

fn name_continuation() -> impl Parser<TokenSpan, (), Error = ParserError> + Clone {
    filter(|(tok, _): &TokenSpan| matches!(tok, Token::Name(_) | Token::Dot)).ignored()
}

/// Numbers (with an adjacent sign), `True`/`False`/`None`, and strings
pub(crate) fn literal() -> impl Parser<TokenSpan, Literal, Error = ParserError> + Clone {
    let float = sign()
        .or_not()
        .then(filter_map(|span, (tok, range): TokenSpan| match tok {
            Token::Float(text) => Ok(text),
            tok => Err(ParserError::expected_input_found(span, None, Some((tok, range)))),
        }))
        .then_ignore(not_followed_by(name_continuation()))
        .map(|(sign, digits)| Literal::Float(format!("{}{}", sign.unwrap_or(""), digits)));

    // `1.` and `1e5` fall through to symbols
    let int = sign()
        .or_not()
        .then(filter_map(|span, (tok, range): TokenSpan| match tok {
            Token::Int(text) => Ok(text),
            tok => Err(ParserError::expected_input_found(span, None, Some((tok, range)))),
        }))
        .then_ignore(not_followed_by(name_continuation()))
        .map(|(sign, digits)| Literal::Int(format!("{}{}", sign.unwrap_or(""), digits)));

    let keyword = filter_map(|span, (tok, range): TokenSpan| {
        let literal = match &tok {
            Token::Name(text) => match text.as_str() {
                "True" => Some(Literal::Bool(true)),
                "False" => Some(Literal::Bool(false)),
                "None" => Some(Literal::None),
                _ => None,
            },
            _ => None,
        };
        literal.ok_or_else(|| ParserError::expected_input_found(span, None, Some((tok, range))))
    })
    .then_ignore(not_followed_by(token(Token::Dot)));

    let string = filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Str(text) | Token::LongStr(text) => Ok(Literal::Str(text)),
        tok => Err(ParserError::expected_input_found(span, None, Some((tok, range)))),
    });

    choice((float, int, keyword, string))
}

fn product_op() -> impl Parser<TokenSpan, BinaryOp, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Star => Ok(BinaryOp::Mul),
        Token::Slash => Ok(BinaryOp::Div),
        tok => Err(ParserError::expected_input_found(span, None, Some((tok, range)))),
    })
}

fn sum_op() -> impl Parser<TokenSpan, BinaryOp, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Plus => Ok(BinaryOp::Add),
        Token::Minus => Ok(BinaryOp::Sub),
        tok => Err(ParserError::expected_input_found(span, None, Some((tok, range)))),
    })
}

/// A default-value expression
pub(crate) fn expression() -> impl Parser<TokenSpan, Expression, Error = ParserError> + Clone {
    recursive(|expr| {
        let items = padded(expr.clone())
            .separated_by(token(Token::Comma))
            .allow_trailing()
            .then_ignore(ws());

        let list = items
            .clone()
            .delimited_by(token(Token::LBracket), token(Token::RBracket))
            .map(Expression::List);

        // One item without a trailing comma is plain grouping
        let tuple = padded(expr.clone())
            .separated_by(token(Token::Comma))
            .then(token(Token::Comma).or_not())
            .then_ignore(ws())
            .delimited_by(token(Token::LParen), token(Token::RParen))
            .map(|(mut items, trailing_comma): (Vec<Expression>, Option<()>)| {
                if items.len() == 1 && trailing_comma.is_none() {
                    items.remove(0)
                } else {
                    Expression::Tuple(items)
                }
            });

        let pair = padded(expr.clone())
            .then_ignore(token(Token::Colon))
            .then(padded(expr.clone()));
        let dict = pair
            .separated_by(token(Token::Comma))
            .allow_trailing()
            .then_ignore(ws())
            .delimited_by(token(Token::LBrace), token(Token::RBrace))
            .map(Expression::Dict);

        let set = items
            .clone()
            .delimited_by(token(Token::LBrace), token(Token::RBrace))
            .map(Expression::Set);

        let call = symbol()
            .then(
                lead(items.clone().delimited_by(token(Token::LParen), token(Token::RParen)))
                    .repeated()
                    .at_least(1),
            )
            .map(|(name, arguments)| Expression::Call { name, arguments });

        let atom = choice((
            list,
            tuple,
            dict,
            set,
            call,
            literal().map(Expression::Literal),
            symbol().map(Expression::Symbol),
        ));

        let product = atom
            .clone()
            .then(lead(product_op()).then(lead(atom)).repeated())
            .foldl(|left, (op, right)| Expression::binary(op, left, right));

        product
            .clone()
            .then(lead(sum_op()).then(lead(product)).repeated())
            .foldl(|left, (op, right)| Expression::binary(op, left, right))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pyx::testing::run_parser;

    fn parse(source: &str) -> Expression {
        run_parser(expression(), source).expect("expression should parse")
    }

    fn int(text: &str) -> Expression {
        Expression::int(text)
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse("42"), int("42"));
        assert_eq!(parse("-1"), int("-1"));
        assert_eq!(parse("2.5"), Expression::Literal(Literal::Float("2.5".into())));
        assert_eq!(parse("True"), Expression::Literal(Literal::Bool(true)));
        assert_eq!(parse("None"), Expression::Literal(Literal::None));
        assert_eq!(parse("'x'"), Expression::Literal(Literal::Str("'x'".into())));
    }

    #[test]
    fn test_symbols() {
        assert_eq!(parse("np.float64"), Expression::symbol("np.float64"));
        assert_eq!(parse("None.x"), Expression::symbol("None.x"));
        assert_eq!(parse("0x1F"), Expression::symbol("0x1F"));
    }

    #[test]
    fn test_containers() {
        assert_eq!(parse("[1, 2]"), Expression::List(vec![int("1"), int("2")]));
        assert_eq!(parse("[ ]"), Expression::List(vec![]));
        assert_eq!(parse("(1,)"), Expression::Tuple(vec![int("1")]));
        assert_eq!(parse("()"), Expression::Tuple(vec![]));
        assert_eq!(parse("(1)"), int("1"));
        assert_eq!(parse("{1, 2,}"), Expression::Set(vec![int("1"), int("2")]));
        assert_eq!(
            parse("{'a': 1}"),
            Expression::Dict(vec![(
                Expression::Literal(Literal::Str("'a'".into())),
                int("1")
            )])
        );
    }

    #[test]
    fn test_calls() {
        assert_eq!(
            parse("Foo(1)(2, 3)"),
            Expression::Call {
                name: "Foo".into(),
                arguments: vec![vec![int("1")], vec![int("2"), int("3")]],
            }
        );
        assert_eq!(
            parse("np.zeros( )"),
            Expression::Call {
                name: "np.zeros".into(),
                arguments: vec![vec![]],
            }
        );
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parse("1 + 2 * 3"),
            Expression::binary(
                BinaryOp::Add,
                int("1"),
                Expression::binary(BinaryOp::Mul, int("2"), int("3"))
            )
        );
        assert_eq!(
            parse("(1 + 2) * 3"),
            Expression::binary(
                BinaryOp::Mul,
                Expression::binary(BinaryOp::Add, int("1"), int("2")),
                int("3")
            )
        );
        assert_eq!(
            parse("8 - 2 - 1"),
            Expression::binary(
                BinaryOp::Sub,
                Expression::binary(BinaryOp::Sub, int("8"), int("2")),
                int("1")
            )
        );
    }
}
