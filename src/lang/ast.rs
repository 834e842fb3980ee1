use super::{Error, Number, VariableName};
use crate::error;
use std::collections::HashMap;
use std::fmt;

type Result<T> = std::result::Result<T, Error>;

/// Variable store. Unbound variables read as zero.
pub type VariableBindings = HashMap<VariableName, Number>;

/// Random number source used by `RND`.
///
/// Three-state Wichmann-Hill generator with a fixed seed, so programs that
/// use `RND` replay identically from a fresh interpreter.
#[derive(Debug, Clone)]
pub struct Rng {
    state: (u32, u32, u32),
}

impl Default for Rng {
    fn default() -> Rng {
        Rng { state: (1, 1, 1) }
    }
}

impl Rng {
    pub fn new() -> Rng {
        Rng::default()
    }

    /// Uniform integer in `[0, limit)`. The limit must be positive.
    pub fn next_below(&mut self, limit: Number) -> Result<Number> {
        if limit <= 0 {
            return Err(error!(IllegalFunctionCall; "RND ARGUMENT MUST BE POSITIVE"));
        }
        self.state.0 = (171 * self.state.0) % 30269;
        self.state.1 = (172 * self.state.1) % 30307;
        self.state.2 = (170 * self.state.2) % 30323;
        let uniform = (f64::from(self.state.0) / 30269.0
            + f64::from(self.state.1) / 30307.0
            + f64::from(self.state.2) / 30323.0)
            % 1.0;
        Ok((uniform * f64::from(limit)) as Number)
    }
}

/// Binary arithmetic operator.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ArithOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithOp {
    pub fn apply(self, lhs: Number, rhs: Number) -> Result<Number> {
        use ArithOp::*;
        match self {
            Add => lhs.checked_add(rhs).ok_or_else(|| error!(Overflow)),
            Subtract => lhs.checked_sub(rhs).ok_or_else(|| error!(Overflow)),
            Multiply => lhs.checked_mul(rhs).ok_or_else(|| error!(Overflow)),
            Divide => {
                if rhs == 0 {
                    Err(error!(DivisionByZero))
                } else {
                    // truncates toward zero; MIN / -1 is the one overflow case
                    lhs.checked_div(rhs).ok_or_else(|| error!(Overflow))
                }
            }
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ArithOp::*;
        match self {
            Add => write!(f, "+"),
            Subtract => write!(f, "-"),
            Multiply => write!(f, "*"),
            Divide => write!(f, "/"),
        }
    }
}

/// Relational operator.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum RelOp {
    Less,
    LessEqual,
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
}

impl RelOp {
    pub fn is_true_for(self, lhs: Number, rhs: Number) -> bool {
        use RelOp::*;
        match self {
            Less => lhs < rhs,
            LessEqual => lhs <= rhs,
            Equal => lhs == rhs,
            NotEqual => lhs != rhs,
            Greater => lhs > rhs,
            GreaterEqual => lhs >= rhs,
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use RelOp::*;
        match self {
            Less => write!(f, "<"),
            LessEqual => write!(f, "<="),
            Equal => write!(f, "="),
            NotEqual => write!(f, "<>"),
            Greater => write!(f, ">"),
            GreaterEqual => write!(f, ">="),
        }
    }
}

/// Result of parsing a factor.
#[derive(Debug, PartialEq, Clone)]
pub enum Factor {
    Number(Number),
    ParenExpr(Box<Expression>),
    Var(VariableName),
    ArrayElement(Box<Expression>),
    Rnd(Box<Expression>),
}

impl Factor {
    pub fn evaluate(&self, v: &VariableBindings, a: &[Number], rng: &mut Rng) -> Result<Number> {
        match self {
            Factor::Number(n) => Ok(*n),
            Factor::ParenExpr(e) => e.evaluate(v, a, rng),
            Factor::Var(name) => Ok(*v.get(name).unwrap_or(&0)),
            Factor::ArrayElement(e) => {
                let index = e.evaluate(v, a, rng)?;
                if index < 0 || index as usize >= a.len() {
                    Err(error!(SubscriptOutOfRange))
                } else {
                    Ok(a[index as usize])
                }
            }
            Factor::Rnd(e) => {
                let limit = e.evaluate(v, a, rng)?;
                rng.next_below(limit)
            }
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Factor::Number(n) => write!(f, "{}", n),
            Factor::ParenExpr(e) => write!(f, "({})", e),
            Factor::Var(name) => write!(f, "{}", *name as char),
            Factor::ArrayElement(e) => write!(f, "@({})", e),
            Factor::Rnd(e) => write!(f, "RND({})", e),
        }
    }
}

/// Result of parsing a term.
///
/// The tree leans right because the grammar is right-recursive, but
/// evaluation folds along the right spine so `*` and `/` associate left.
#[derive(Debug, PartialEq, Clone)]
pub enum Term {
    Value(Factor),
    Compound(Factor, ArithOp, Box<Term>),
}

impl Term {
    pub fn evaluate(&self, v: &VariableBindings, a: &[Number], rng: &mut Rng) -> Result<Number> {
        let (factor, mut rest) = self.parts();
        let mut acc = factor.evaluate(v, a, rng)?;
        while let Some((op, node)) = rest {
            let (factor, next) = node.parts();
            acc = op.apply(acc, factor.evaluate(v, a, rng)?)?;
            rest = next;
        }
        Ok(acc)
    }

    fn parts(&self) -> (&Factor, Option<(ArithOp, &Term)>) {
        match self {
            Term::Value(factor) => (factor, None),
            Term::Compound(factor, op, tail) => (factor, Some((*op, tail.as_ref()))),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Value(factor) => write!(f, "{}", factor),
            Term::Compound(factor, op, tail) => write!(f, "{} {} {}", factor, op, tail),
        }
    }
}

/// Result of parsing an expression with no leading sign.
#[derive(Debug, PartialEq, Clone)]
pub enum UnsignedExpression {
    Value(Term),
    Compound(Term, ArithOp, Box<UnsignedExpression>),
}

impl UnsignedExpression {
    pub fn evaluate(&self, v: &VariableBindings, a: &[Number], rng: &mut Rng) -> Result<Number> {
        self.fold(false, v, a, rng)
    }

    /// Evaluate with the first term negated: `-a+b` is `(-a)+b`, not `-(a+b)`.
    pub fn evaluate_with_negated_first_term(
        &self,
        v: &VariableBindings,
        a: &[Number],
        rng: &mut Rng,
    ) -> Result<Number> {
        self.fold(true, v, a, rng)
    }

    fn fold(
        &self,
        negate_first: bool,
        v: &VariableBindings,
        a: &[Number],
        rng: &mut Rng,
    ) -> Result<Number> {
        let (term, mut rest) = self.parts();
        let mut acc = term.evaluate(v, a, rng)?;
        if negate_first {
            acc = acc.checked_neg().ok_or_else(|| error!(Overflow))?;
        }
        while let Some((op, node)) = rest {
            let (term, next) = node.parts();
            acc = op.apply(acc, term.evaluate(v, a, rng)?)?;
            rest = next;
        }
        Ok(acc)
    }

    fn parts(&self) -> (&Term, Option<(ArithOp, &UnsignedExpression)>) {
        match self {
            UnsignedExpression::Value(term) => (term, None),
            UnsignedExpression::Compound(term, op, tail) => (term, Some((*op, tail.as_ref()))),
        }
    }
}

impl fmt::Display for UnsignedExpression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnsignedExpression::Value(term) => write!(f, "{}", term),
            UnsignedExpression::Compound(term, op, tail) => {
                write!(f, "{} {} {}", term, op, tail)
            }
        }
    }
}

/// Result of parsing an expression.
#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Unsigned(UnsignedExpression),
    Plus(UnsignedExpression),
    Minus(UnsignedExpression),
}

impl Expression {
    /// An expression that is just a numeric constant.
    pub fn number(n: Number) -> Expression {
        Expression::Unsigned(UnsignedExpression::Value(Term::Value(Factor::Number(n))))
    }

    pub fn evaluate(&self, v: &VariableBindings, a: &[Number], rng: &mut Rng) -> Result<Number> {
        match self {
            Expression::Unsigned(u) | Expression::Plus(u) => u.evaluate(v, a, rng),
            Expression::Minus(u) => u.evaluate_with_negated_first_term(v, a, rng),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Unsigned(u) => write!(f, "{}", u),
            Expression::Plus(u) => write!(f, "+{}", u),
            Expression::Minus(u) => write!(f, "-{}", u),
        }
    }
}

/// A storable location: a variable or an array element.
#[derive(Debug, PartialEq, Clone)]
pub enum Lvalue {
    Var(VariableName),
    ArrayElement(Box<Expression>),
}

impl fmt::Display for Lvalue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Lvalue::Var(name) => write!(f, "{}", *name as char),
            Lvalue::ArrayElement(e) => write!(f, "@({})", e),
        }
    }
}

/// An item in a PRINT list.
#[derive(Debug, PartialEq, Clone)]
pub enum PrintItem {
    Expression(Expression),
    StringLiteral(Vec<u8>),
}

impl PrintItem {
    pub fn print_text(&self, v: &VariableBindings, a: &[Number], rng: &mut Rng) -> Result<Vec<u8>> {
        match self {
            PrintItem::Expression(e) => Ok(e.evaluate(v, a, rng)?.to_string().into_bytes()),
            PrintItem::StringLiteral(chars) => Ok(chars.clone()),
        }
    }
}

impl fmt::Display for PrintItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PrintItem::Expression(e) => write!(f, "{}", e),
            PrintItem::StringLiteral(chars) => {
                write!(f, "\"{}\"", String::from_utf8_lossy(chars))
            }
        }
    }
}

/// Text emitted after a PRINT item. The final item's separator decides
/// whether the statement ends with a newline.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum PrintSeparator {
    Newline,
    Tab,
    Empty,
}

/// Non-empty list of PRINT items with their separators.
#[derive(Debug, PartialEq, Clone)]
pub struct PrintList {
    pub items: Vec<(PrintItem, PrintSeparator)>,
}

impl PrintList {
    pub fn print_text(&self, v: &VariableBindings, a: &[Number], rng: &mut Rng) -> Result<Vec<u8>> {
        let mut text = Vec::new();
        for (item, separator) in &self.items {
            text.extend(item.print_text(v, a, rng)?);
            match separator {
                PrintSeparator::Newline => text.push(b'\n'),
                PrintSeparator::Tab => text.push(b'\t'),
                PrintSeparator::Empty => {}
            }
        }
        Ok(text)
    }
}

impl fmt::Display for PrintList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, (item, separator)) in self.items.iter().enumerate() {
            write!(f, "{}", item)?;
            let last = index + 1 == self.items.len();
            match separator {
                PrintSeparator::Newline => {}
                PrintSeparator::Tab => {
                    write!(f, ",")?;
                    if !last {
                        write!(f, " ")?;
                    }
                }
                PrintSeparator::Empty => {
                    write!(f, ";")?;
                    if !last {
                        write!(f, " ")?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Line bounds of a LIST statement.
#[derive(Debug, PartialEq, Clone)]
pub enum ListRange {
    All,
    Single(Expression),
    Range(Expression, Expression),
}

/// A parsed statement, one variant per keyword.
#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Print(PrintList),
    PrintNewline,
    Let(Lvalue, Expression),
    Input(Vec<Lvalue>),
    IfThen(Expression, RelOp, Expression, Box<Statement>),
    Goto(Expression),
    Gosub(Expression),
    Return,
    Run,
    End,
    List(ListRange),
    Clear,
    Rem(String),
    Dim(Expression),
    Save(String),
    Load(String),
    Files,
    ClipSave,
    ClipLoad,
    Tron,
    Troff,
    Bye,
    Help,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Statement::Print(list) => write!(f, "PRINT {}", list),
            Statement::PrintNewline => write!(f, "PRINT"),
            Statement::Let(lvalue, expression) => write!(f, "LET {} = {}", lvalue, expression),
            Statement::Input(lvalues) => {
                write!(f, "INPUT ")?;
                for (index, lvalue) in lvalues.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", lvalue)?;
                }
                Ok(())
            }
            Statement::IfThen(lhs, op, rhs, consequent) => {
                write!(f, "IF {} {} {} THEN {}", lhs, op, rhs, consequent)
            }
            Statement::Goto(e) => write!(f, "GOTO {}", e),
            Statement::Gosub(e) => write!(f, "GOSUB {}", e),
            Statement::Return => write!(f, "RETURN"),
            Statement::Run => write!(f, "RUN"),
            Statement::End => write!(f, "END"),
            Statement::List(ListRange::All) => write!(f, "LIST"),
            Statement::List(ListRange::Single(e)) => write!(f, "LIST {}", e),
            Statement::List(ListRange::Range(low, high)) => write!(f, "LIST {}, {}", low, high),
            Statement::Clear => write!(f, "CLEAR"),
            Statement::Rem(text) => {
                if text.is_empty() {
                    write!(f, "REM")
                } else {
                    write!(f, "REM {}", text)
                }
            }
            Statement::Dim(e) => write!(f, "DIM @({})", e),
            Statement::Save(name) => write!(f, "SAVE \"{}\"", name),
            Statement::Load(name) => write!(f, "LOAD \"{}\"", name),
            Statement::Files => write!(f, "FILES"),
            Statement::ClipSave => write!(f, "CLIPSAVE"),
            Statement::ClipLoad => write!(f, "CLIPLOAD"),
            Statement::Tron => write!(f, "TRON"),
            Statement::Troff => write!(f, "TROFF"),
            Statement::Bye => write!(f, "BYE"),
            Statement::Help => write!(f, "HELP"),
        }
    }
}
