/*!
Recursive-descent grammar for Tiny BASIC.

Every rule is a pure function from an [`InputPos`] to a [`ParseResult`];
positions are `Copy`, so a failed alternative costs nothing to retry.

*/

use super::ast::*;
use super::lex::{any_character, literal, number_literal, string_literal, variable_name};
use super::position::{maybe, InputPos, ParseResult};
use super::{Error, Number};
use crate::error;

type Result<T> = std::result::Result<T, Error>;

/// Classification of one line of input.
#[derive(Debug, PartialEq, Clone)]
pub enum Line {
    Empty,
    /// A bare line number deletes that line from the program.
    Delete(Number),
    /// A numbered statement is stored in the program.
    Insert(Number, Statement),
    /// An unnumbered statement is executed at once.
    Immediate(Statement),
}

/// Parse a full input line. Anything left over past a parsed statement,
/// other than spaces, makes the whole line a syntax error.
pub fn line(input: &[u8]) -> Result<Line> {
    let pos = InputPos::new(input);
    if pos.is_remaining_line_empty() {
        return Ok(Line::Empty);
    }
    if let Some((number, next)) = number_literal(pos) {
        if number == 0 {
            return Err(error!(SyntaxError; "LINE 0 IS RESERVED"));
        }
        if next.is_remaining_line_empty() {
            return Ok(Line::Delete(number));
        }
        let (statement, next) = statement(next).ok_or_else(|| error!(SyntaxError))?;
        if !next.is_remaining_line_empty() {
            return Err(error!(SyntaxError));
        }
        return Ok(Line::Insert(number, statement));
    }
    let (statement, next) = statement(pos).ok_or_else(|| error!(SyntaxError))?;
    if !next.is_remaining_line_empty() {
        return Err(error!(SyntaxError));
    }
    Ok(Line::Immediate(statement))
}

/// Parse a statement. Keyword matching is case-insensitive and ignores
/// spaces inside keywords; longer keywords are tried before their prefixes.
pub fn statement(pos: InputPos) -> ParseResult<Statement> {
    if let Some((_, next)) = literal("PRINT", pos) {
        return print_tail(next);
    }
    if let Some((_, next)) = literal("PR", pos) {
        return print_tail(next);
    }
    if let Some((_, next)) = literal("?", pos) {
        return print_tail(next);
    }
    if let Some((_, next)) = literal("LET", pos) {
        return let_tail(next);
    }
    if let Some((_, next)) = literal("INPUT", pos) {
        return input_tail(next);
    }
    if let Some((_, next)) = literal("IN", pos) {
        return input_tail(next);
    }
    if let Some((_, next)) = literal("IF", pos) {
        return if_tail(next);
    }
    if let Some((_, next)) = literal("GOSUB", pos) {
        let (e, next) = expression(next)?;
        return Some((Statement::Gosub(e), next));
    }
    if let Some((_, next)) = literal("GOTO", pos) {
        let (e, next) = expression(next)?;
        return Some((Statement::Goto(e), next));
    }
    if let Some((_, next)) = literal("RETURN", pos) {
        return Some((Statement::Return, next));
    }
    if let Some((_, next)) = literal("RUN", pos) {
        return Some((Statement::Run, next));
    }
    if let Some((_, next)) = literal("END", pos) {
        return Some((Statement::End, next));
    }
    if let Some((_, next)) = literal("LIST", pos) {
        return list_tail(next);
    }
    if let Some((_, next)) = literal("CLIPSAVE", pos) {
        return Some((Statement::ClipSave, next));
    }
    if let Some((_, next)) = literal("CLIPLOAD", pos) {
        return Some((Statement::ClipLoad, next));
    }
    if let Some((_, next)) = literal("CLEAR", pos) {
        return Some((Statement::Clear, next));
    }
    if let Some((_, next)) = literal("REM", pos) {
        return rem_tail(next);
    }
    if let Some((_, next)) = literal("DIM", pos) {
        let (e, next) = array_subscript(next)?;
        return Some((Statement::Dim(e), next));
    }
    if let Some((_, next)) = literal("SAVE", pos) {
        let (name, next) = filename(next)?;
        return Some((Statement::Save(name), next));
    }
    if let Some((_, next)) = literal("LOAD", pos) {
        let (name, next) = filename(next)?;
        return Some((Statement::Load(name), next));
    }
    if let Some((_, next)) = literal("FILES", pos) {
        return Some((Statement::Files, next));
    }
    if let Some((_, next)) = literal("TRON", pos) {
        return Some((Statement::Tron, next));
    }
    if let Some((_, next)) = literal("TROFF", pos) {
        return Some((Statement::Troff, next));
    }
    if let Some((_, next)) = literal("BYE", pos) {
        return Some((Statement::Bye, next));
    }
    if let Some((_, next)) = literal("HELP", pos) {
        return Some((Statement::Help, next));
    }
    // assignment with the LET keyword omitted
    let_tail(pos)
}

fn print_tail(pos: InputPos) -> ParseResult<Statement> {
    match print_list(pos) {
        Some((list, next)) => Some((Statement::Print(list), next)),
        None => Some((Statement::PrintNewline, pos)),
    }
}

fn print_list(pos: InputPos) -> ParseResult<PrintList> {
    let (first, mut pos) = print_item(pos)?;
    let mut items = Vec::new();
    let mut pending = first;
    loop {
        match print_separator(pos) {
            Some((separator, after)) => match print_item(after) {
                Some((item, next)) => {
                    items.push((pending, separator));
                    pending = item;
                    pos = next;
                }
                None => {
                    // trailing separator suppresses the newline
                    items.push((pending, separator));
                    return Some((PrintList { items }, after));
                }
            },
            None => {
                items.push((pending, PrintSeparator::Newline));
                return Some((PrintList { items }, pos));
            }
        }
    }
}

fn print_item(pos: InputPos) -> ParseResult<PrintItem> {
    if let Some((chars, next)) = string_literal(pos) {
        return Some((PrintItem::StringLiteral(chars), next));
    }
    let (e, next) = expression(pos)?;
    Some((PrintItem::Expression(e), next))
}

fn print_separator(pos: InputPos) -> ParseResult<PrintSeparator> {
    if let Some((_, next)) = literal(",", pos) {
        return Some((PrintSeparator::Tab, next));
    }
    if let Some((_, next)) = literal(";", pos) {
        return Some((PrintSeparator::Empty, next));
    }
    None
}

fn let_tail(pos: InputPos) -> ParseResult<Statement> {
    let (lv, pos) = lvalue(pos)?;
    let (_, pos) = literal("=", pos)?;
    let (e, pos) = expression(pos)?;
    Some((Statement::Let(lv, e), pos))
}

fn input_tail(pos: InputPos) -> ParseResult<Statement> {
    let (first, mut pos) = lvalue(pos)?;
    let mut lvalues = vec![first];
    while let Some((_, after)) = literal(",", pos) {
        let (lv, next) = lvalue(after)?;
        lvalues.push(lv);
        pos = next;
    }
    Some((Statement::Input(lvalues), pos))
}

fn if_tail(pos: InputPos) -> ParseResult<Statement> {
    let (lhs, pos) = expression(pos)?;
    let (op, pos) = relop(pos)?;
    let (rhs, pos) = expression(pos)?;
    let (_, pos) = maybe(pos, |p| literal("THEN", p));
    let (consequent, pos) = statement(pos)?;
    Some((Statement::IfThen(lhs, op, rhs, Box::new(consequent)), pos))
}

fn list_tail(pos: InputPos) -> ParseResult<Statement> {
    let (low, pos) = match expression(pos) {
        None => return Some((Statement::List(ListRange::All), pos)),
        Some(parsed) => parsed,
    };
    match literal(",", pos) {
        Some((_, after)) => {
            let (high, next) = expression(after)?;
            Some((Statement::List(ListRange::Range(low, high)), next))
        }
        None => Some((Statement::List(ListRange::Single(low)), pos)),
    }
}

fn rem_tail(pos: InputPos) -> ParseResult<Statement> {
    let mut pos = pos.after_spaces();
    let mut text = String::new();
    while let Some((c, next)) = any_character(pos) {
        text.push(c as char);
        pos = next;
    }
    Some((Statement::Rem(text), pos))
}

fn filename(pos: InputPos) -> ParseResult<String> {
    let (chars, next) = string_literal(pos)?;
    Some((String::from_utf8_lossy(&chars).into_owned(), next))
}

fn relop(pos: InputPos) -> ParseResult<RelOp> {
    if let Some((_, next)) = literal("<=", pos) {
        return Some((RelOp::LessEqual, next));
    }
    if let Some((_, next)) = literal("<>", pos) {
        return Some((RelOp::NotEqual, next));
    }
    if let Some((_, next)) = literal("<", pos) {
        return Some((RelOp::Less, next));
    }
    if let Some((_, next)) = literal(">=", pos) {
        return Some((RelOp::GreaterEqual, next));
    }
    if let Some((_, next)) = literal("><", pos) {
        return Some((RelOp::NotEqual, next));
    }
    if let Some((_, next)) = literal(">", pos) {
        return Some((RelOp::Greater, next));
    }
    if let Some((_, next)) = literal("=", pos) {
        return Some((RelOp::Equal, next));
    }
    None
}

fn lvalue(pos: InputPos) -> ParseResult<Lvalue> {
    if let Some((e, next)) = array_subscript(pos) {
        return Some((Lvalue::ArrayElement(Box::new(e)), next));
    }
    let (name, next) = variable_name(pos)?;
    Some((Lvalue::Var(name), next))
}

fn array_subscript(pos: InputPos) -> ParseResult<Expression> {
    let (_, pos) = literal("@", pos)?;
    let (_, pos) = literal("(", pos)?;
    let (e, pos) = expression(pos)?;
    let (_, pos) = literal(")", pos)?;
    Some((e, pos))
}

pub fn expression(pos: InputPos) -> ParseResult<Expression> {
    if let Some((_, next)) = literal("+", pos) {
        let (u, next) = unsigned_expression(next)?;
        return Some((Expression::Plus(u), next));
    }
    if let Some((_, next)) = literal("-", pos) {
        let (u, next) = unsigned_expression(next)?;
        return Some((Expression::Minus(u), next));
    }
    let (u, next) = unsigned_expression(pos)?;
    Some((Expression::Unsigned(u), next))
}

fn unsigned_expression(pos: InputPos) -> ParseResult<UnsignedExpression> {
    let (t, pos) = term(pos)?;
    if let Some((_, after)) = literal("+", pos) {
        if let Some((u, next)) = unsigned_expression(after) {
            return Some((
                UnsignedExpression::Compound(t, ArithOp::Add, Box::new(u)),
                next,
            ));
        }
    }
    if let Some((_, after)) = literal("-", pos) {
        if let Some((u, next)) = unsigned_expression(after) {
            return Some((
                UnsignedExpression::Compound(t, ArithOp::Subtract, Box::new(u)),
                next,
            ));
        }
    }
    Some((UnsignedExpression::Value(t), pos))
}

fn term(pos: InputPos) -> ParseResult<Term> {
    let (f, pos) = factor(pos)?;
    if let Some((_, after)) = literal("*", pos) {
        if let Some((t, next)) = term(after) {
            return Some((Term::Compound(f, ArithOp::Multiply, Box::new(t)), next));
        }
    }
    if let Some((_, after)) = literal("/", pos) {
        if let Some((t, next)) = term(after) {
            return Some((Term::Compound(f, ArithOp::Divide, Box::new(t)), next));
        }
    }
    Some((Term::Value(f), pos))
}

fn factor(pos: InputPos) -> ParseResult<Factor> {
    if let Some((n, next)) = number_literal(pos) {
        return Some((Factor::Number(n), next));
    }
    if let Some((e, next)) = paren_expression(pos) {
        return Some((Factor::ParenExpr(Box::new(e)), next));
    }
    if let Some((e, next)) = array_subscript(pos) {
        return Some((Factor::ArrayElement(Box::new(e)), next));
    }
    // RND before the variable rule, which would otherwise claim the R
    if let Some((e, next)) = rnd_call(pos) {
        return Some((Factor::Rnd(Box::new(e)), next));
    }
    let (name, next) = variable_name(pos)?;
    Some((Factor::Var(name), next))
}

fn paren_expression(pos: InputPos) -> ParseResult<Expression> {
    let (_, pos) = literal("(", pos)?;
    let (e, pos) = expression(pos)?;
    let (_, pos) = literal(")", pos)?;
    Some((e, pos))
}

fn rnd_call(pos: InputPos) -> ParseResult<Expression> {
    let (_, pos) = literal("RND", pos)?;
    let (_, pos) = literal("(", pos)?;
    let (e, pos) = expression(pos)?;
    let (_, pos) = literal(")", pos)?;
    Some((e, pos))
}

/// Parse one value typed in response to INPUT: an optionally signed number,
/// or a variable reference whose current value is substituted.
pub fn input_expression<'a>(
    pos: InputPos<'a>,
    v: &VariableBindings,
) -> ParseResult<'a, Number> {
    if let Some((_, after)) = literal("-", pos) {
        let (n, next) = number_literal(after)?;
        return Some((-n, next));
    }
    if let Some((_, after)) = literal("+", pos) {
        return number_literal(after);
    }
    if let Some((n, next)) = number_literal(pos) {
        return Some((n, next));
    }
    let (name, next) = variable_name(pos)?;
    Some((*v.get(&name).unwrap_or(&0), next))
}
