// ABOUTME: Abstract syntax tree produced by the parser

use crate::token::{Literal, Span};
use std::rc::Rc;

/// A parsed source unit.
#[derive(Debug, Clone)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub file: Rc<str>,
}

/// `let` introduces a mutable binding, `const` an immutable one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindKind {
    Let,
    Const,
}

/// A function or method definition. Shared (`Rc`) between the tree and the
/// closures constructed from it. Carries its source file so frames and
/// errors report positions in the right file across module boundaries.
#[derive(Debug)]
pub struct FunctionDef {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    pub span: Span,
    pub file: Rc<str>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Block {
        body: Vec<Stmt>,
    },
    VarDecl {
        kind: BindKind,
        name: String,
        init: Option<Expr>,
        span: Span,
    },
    /// A named `fun` declaration; anonymous `fun` at statement position
    /// parses as an expression statement.
    Function {
        decl: Rc<FunctionDef>,
    },
    Class {
        name: String,
        methods: Vec<Rc<FunctionDef>>,
        span: Span,
    },
    /// `import "path"` (local absent) or `import X from "path"`.
    Import {
        local: Option<String>,
        path: String,
        span: Span,
    },
    If {
        test: Expr,
        then: Box<Stmt>,
        alt: Option<Box<Stmt>>,
    },
    While {
        test: Expr,
        body: Box<Stmt>,
    },
    For {
        init: Option<Box<Stmt>>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    Return {
        value: Option<Expr>,
        span: Span,
    },
    Break {
        span: Span,
    },
    Continue {
        span: Span,
    },
    Try {
        body: Vec<Stmt>,
        param: Option<String>,
        handler: Option<Vec<Stmt>>,
    },
    Throw {
        value: Expr,
        span: Span,
    },
    Expr {
        expr: Expr,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal {
        value: Literal,
    },
    Ident {
        name: String,
        span: Span,
    },
    This {
        span: Span,
    },
    Array {
        elements: Vec<Expr>,
    },
    /// Object literal; property order is source order.
    Object {
        props: Vec<(String, Expr)>,
    },
    Function {
        decl: Rc<FunctionDef>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },
    Property {
        object: Box<Expr>,
        name: String,
        span: Span,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },
}
