//! Statement tree produced by the parser
//!
//! - [`Value`]: leaf operands (variables, numbers, list slots and accessors)
//! - [`Expression`]: a leaf or a right-recursive binary chain
//! - [`Statement`]: one source statement, owning any nested blocks
//! - [`Program`]: the top-level statement list plus list metadata
//!
//! Every type implements `Display`. Binary expressions print fully
//! parenthesised so the right-recursive shape stays visible:
//! `1 + 2 + 3` prints as `(1 + (2 + 3))`.

use std::fmt;

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "+" => Some(BinOp::Add),
            "-" => Some(BinOp::Sub),
            "*" => Some(BinOp::Mul),
            "/" => Some(BinOp::Div),
            "%" => Some(BinOp::Mod),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        }
    }
}

/// Relational operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Lt,
    Gt,
    Le,
    Ge,
    Ne,
    Eq,
}

impl RelOp {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "<" => Some(RelOp::Lt),
            ">" => Some(RelOp::Gt),
            "<=" => Some(RelOp::Le),
            ">=" => Some(RelOp::Ge),
            "<>" => Some(RelOp::Ne),
            "==" => Some(RelOp::Eq),
            _ => None,
        }
    }

    /// Source spelling
    pub fn symbol(self) -> &'static str {
        match self {
            RelOp::Lt => "<",
            RelOp::Gt => ">",
            RelOp::Le => "<=",
            RelOp::Ge => ">=",
            RelOp::Ne => "<>",
            RelOp::Eq => "==",
        }
    }
}

/// Leaf operand. Never contains another value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Variable(String),
    Number(f64),
    /// `L[2]`
    ListIndexConst { list: String, index: usize },
    /// `L[i]`
    ListIndexVar { list: String, index: String },
    ListFirst(String),
    ListLast(String),
    ListSize(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Variable(name) => write!(f, "{}", name),
            Value::Number(n) => write!(f, "{}", n),
            Value::ListIndexConst { list, index } => write!(f, "{}[{}]", list, index),
            Value::ListIndexVar { list, index } => write!(f, "{}[{}]", list, index),
            Value::ListFirst(list) => write!(f, "{}.first", list),
            Value::ListLast(list) => write!(f, "{}.last", list),
            Value::ListSize(list) => write!(f, "{}.size", list),
        }
    }
}

/// Arithmetic expression, right-recursive: the left side of a binary node is
/// always the operand that was read first.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Leaf(Value),
    Binary {
        left: Box<Expression>,
        op: BinOp,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn binary(left: Expression, op: BinOp, right: Expression) -> Self {
        Expression::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Leaf(value) => write!(f, "{}", value),
            Expression::Binary { left, op, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
        }
    }
}

/// Condition of an `if` or `while`
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Value,
    pub op: RelOp,
    pub right: Value,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op.symbol(), self.right)
    }
}

/// Operand of an `anunciar` statement
#[derive(Debug, Clone, PartialEq)]
pub enum AnnounceArg {
    /// String literal, quotes included
    Literal(String),
    Expr(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Declare {
        names: Vec<String>,
    },
    DeclareList {
        names: Vec<String>,
    },
    /// `x = expr`, `L[2] = expr` or `L[i] = expr`
    Assign {
        target: Value,
        expr: Expression,
    },
    /// `L <- expr`
    AssignListPush {
        list: String,
        expr: Expression,
    },
    /// `x = promo` or `L[i] = promo`
    Read {
        target: Value,
    },
    /// `L <- promo`
    ReadListPush {
        list: String,
    },
    Announce(AnnounceArg),
    If {
        condition: Comparison,
        then_branch: Vec<Statement>,
        else_branch: Option<Vec<Statement>>,
    },
    While {
        condition: Comparison,
        body: Vec<Statement>,
    },
}

impl Statement {
    fn fmt_at(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            Statement::Declare { names } => writeln!(f, "{}declare {}", pad, names.join(", ")),
            Statement::DeclareList { names } => {
                writeln!(f, "{}declare list {}", pad, names.join(", "))
            }
            Statement::Assign { target, expr } => {
                writeln!(f, "{}assign {} = {}", pad, target, expr)
            }
            Statement::AssignListPush { list, expr } => {
                writeln!(f, "{}push {} <- {}", pad, list, expr)
            }
            Statement::Read { target } => writeln!(f, "{}read {}", pad, target),
            Statement::ReadListPush { list } => writeln!(f, "{}read push {}", pad, list),
            Statement::Announce(AnnounceArg::Literal(text)) => {
                writeln!(f, "{}announce {}", pad, text)
            }
            Statement::Announce(AnnounceArg::Expr(expr)) => {
                writeln!(f, "{}announce {}", pad, expr)
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                writeln!(f, "{}if {}", pad, condition)?;
                write_block(f, then_branch, depth + 1)?;
                if let Some(else_branch) = else_branch {
                    writeln!(f, "{}else", pad)?;
                    write_block(f, else_branch, depth + 1)?;
                }
                writeln!(f, "{}end if", pad)
            }
            Statement::While { condition, body } => {
                writeln!(f, "{}while {}", pad, condition)?;
                write_block(f, body, depth + 1)?;
                writeln!(f, "{}end while", pad)
            }
        }
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, statements: &[Statement], depth: usize) -> fmt::Result {
    for statement in statements {
        statement.fmt_at(f, depth)?;
    }
    Ok(())
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_at(f, 0)
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    /// Whether any list was declared, at any depth
    pub has_lists: bool,
    /// Every declared list name, first declaration order, no duplicates
    pub list_names: Vec<String>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    /// Record a declared list name for end-of-program cleanup
    pub fn add_list_name(&mut self, name: &str) {
        self.has_lists = true;
        if !self.list_names.iter().any(|n| n == name) {
            self.list_names.push(name.to_string());
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "program")?;
        write_block(f, &self.statements, 1)?;
        if self.has_lists {
            writeln!(f, "lists: {}", self.list_names.join(", "))?;
        }
        Ok(())
    }
}
