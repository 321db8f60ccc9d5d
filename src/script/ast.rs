//! Syntax tree of a Gant script

use std::fmt;
use std::rc::Rc;

/// Line and column of a token, both starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Piece of a double-quoted string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    /// `${name}` or `$name`
    Variable(String),
}

/// Statements of a script or closure, shared by every body created from it
pub type Block = Rc<[Statement]>;

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `name = value` or `def name = value`
    Assign { name: String, value: Expr },
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Template(Vec<Segment>),
    List(Vec<Self>),
    Map(Vec<(String, Self)>),
    Closure(Block),
    Variable(String),
    /// `receiver.name` without a call
    Property { receiver: Box<Self>, name: String },
    Call(Call),
}

/// A method call with its arguments in source order
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// `ant` in `ant.copy(...)`; `None` for an unqualified call
    pub receiver: Option<Box<Expr>>,
    pub name: String,
    /// `key: value` arguments, passed to the callee as one leading map
    pub named: Vec<(String, Expr)>,
    pub positional: Vec<Expr>,
    /// Trailing `{ ... }`, passed last
    pub closure: Option<Block>,
}
