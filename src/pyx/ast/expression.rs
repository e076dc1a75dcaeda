//! Default-value expressions
//!
//! Defaults are kept structurally (rather than as raw text) so the renderer can
//! normalize spacing and re-insert only the parentheses precedence requires.

/// A literal value, kept with its source spelling
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer, sign included
    Int(String),
    /// Decimal float, sign included
    Float(String),
    Bool(bool),
    None,
    /// Quoted string, prefix and quotes included
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Add,
    Sub,
}

impl BinaryOp {
    /// Higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Mul | BinaryOp::Div => 2,
            BinaryOp::Add | BinaryOp::Sub => 1,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    /// Dotted name such as `np.float64` or `MAX_SIZE`
    Symbol(String),
    List(Vec<Expression>),
    Tuple(Vec<Expression>),
    Set(Vec<Expression>),
    Dict(Vec<(Expression, Expression)>),
    /// A named constructor call; each inner vector is one argument group, so
    /// `f(1)(2)` has two groups
    Call {
        name: String,
        arguments: Vec<Vec<Expression>>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Expression::Symbol(name.into())
    }

    pub fn int(digits: impl Into<String>) -> Self {
        Expression::Literal(Literal::Int(digits.into()))
    }
}
