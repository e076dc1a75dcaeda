//! Expression, type and parameter rendering
//!
//! Expressions are rendered with normalized spacing. Binary operations only get
//! the parentheses their precedence requires, so `(2 * 3) + 1` comes back as
//! `2 * 3 + 1` while `2 * (3 + 1)` keeps its group.

use crate::pyx::ast::{BinaryOp, Expression, Literal, Parameter, TypeExpr};
use crate::pyx::config::StubConfig;

/// How a parameter is spelled in the stub
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterStyle {
    /// `name: Type=default`, as written in plain `def` headers
    Plain,
    /// `name: Type = default`, for parameters lifted from typed headers
    Typed,
}

pub fn render_literal(literal: &Literal) -> String {
    match literal {
        Literal::Int(digits) | Literal::Float(digits) => digits.clone(),
        Literal::Bool(true) => "True".to_string(),
        Literal::Bool(false) => "False".to_string(),
        Literal::None => "None".to_string(),
        Literal::Str(quoted) => quoted.clone(),
    }
}

fn join(items: &[Expression]) -> String {
    items
        .iter()
        .map(render_expression)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_expression(expression: &Expression) -> String {
    match expression {
        Expression::Literal(literal) => render_literal(literal),
        Expression::Symbol(name) => name.clone(),
        Expression::List(items) => format!("[{}]", join(items)),
        Expression::Tuple(items) if items.len() == 1 => format!("({},)", join(items)),
        Expression::Tuple(items) => format!("({})", join(items)),
        Expression::Set(items) => format!("{{{}}}", join(items)),
        Expression::Dict(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(key, value)| format!("{}: {}", render_expression(key), render_expression(value)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Expression::Call { name, arguments } => {
            let groups: String = arguments
                .iter()
                .map(|group| format!("({})", join(group)))
                .collect();
            format!("{}{}", name, groups)
        }
        Expression::Binary { op, left, right } => format!(
            "{} {} {}",
            operand(left, *op, false),
            op.symbol(),
            operand(right, *op, true)
        ),
    }
}

/// Render a binary operand, parenthesized when it would otherwise regroup
///
/// Operators are left-associative: a right operand of equal precedence needs
/// parentheses, a left one does not.
fn operand(expression: &Expression, parent: BinaryOp, right_side: bool) -> String {
    let rendered = render_expression(expression);
    match expression {
        Expression::Binary { op, .. } => {
            let needs_group = if right_side {
                op.precedence() <= parent.precedence()
            } else {
                op.precedence() < parent.precedence()
            };
            if needs_group {
                format!("({})", rendered)
            } else {
                rendered
            }
        }
        _ => rendered,
    }
}

fn render_type_component(ty: &TypeExpr, config: &StubConfig) -> String {
    let mut rendered = config.convert_component(&ty.name);
    if !ty.arguments.is_empty() {
        let arguments: Vec<String> = ty
            .arguments
            .iter()
            .map(|argument| render_type_component(argument, config))
            .collect();
        rendered.push('[');
        rendered.push_str(&arguments.join(", "));
        rendered.push(']');
    }
    if let Some(default) = &ty.default {
        rendered.push('=');
        rendered.push_str(&render_expression(default));
    }
    rendered
}

/// Render a type annotation: component rewrites apply per name, the complete
/// rewrite applies once to the result
pub fn render_type(ty: &TypeExpr, config: &StubConfig) -> String {
    config.convert_complete(&render_type_component(ty, config))
}

pub fn render_parameter(parameter: &Parameter, style: ParameterStyle, config: &StubConfig) -> String {
    let mut rendered = parameter.name.clone();
    if let Some(annotation) = &parameter.annotation {
        rendered.push_str(": ");
        rendered.push_str(&render_type(annotation, config));
    }
    if let Some(default) = &parameter.default {
        let separator = match style {
            ParameterStyle::Plain => "=",
            ParameterStyle::Typed if parameter.annotation.is_some() => " = ",
            ParameterStyle::Typed => "=",
        };
        rendered.push_str(separator);
        rendered.push_str(&render_expression(default));
    }
    rendered
}
