//! Curve expressions.
//!
//! Configurations are plain data, so functions such as `f(x) = x²` are written as expression
//! strings (`"x^2"`). Both `x` and `t` name the free parameter. Evaluation is total: undefined
//! regions (`sqrt(-1)`, `1/0`) produce NaN or infinities and it is up to the sampler to discard
//! them.

use crate::{Error, Result};
use logos::Logos;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum Token<'s> {
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice())]
    Ident(&'s str),
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    #[token("**")]
    Caret,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Func1 {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sqrt,
    Abs,
    Exp,
    Ln,
    Log10,
    Floor,
    Ceil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Func2 {
    Min,
    Max,
    Pow,
    Atan2,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Num(f64),
    Var,
    Neg(Box<Node>),
    Bin(BinOp, Box<Node>, Box<Node>),
    Call1(Func1, Box<Node>),
    Call2(Func2, Box<Node>, Box<Node>),
}

impl Node {
    fn eval(&self, v: f64) -> f64 {
        match self {
            Node::Num(n) => *n,
            Node::Var => v,
            Node::Neg(a) => -a.eval(v),
            Node::Bin(op, a, b) => {
                let (a, b) = (a.eval(v), b.eval(v));
                match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                    BinOp::Pow => a.powf(b),
                }
            }
            Node::Call1(f, a) => {
                let a = a.eval(v);
                match f {
                    Func1::Sin => a.sin(),
                    Func1::Cos => a.cos(),
                    Func1::Tan => a.tan(),
                    Func1::Asin => a.asin(),
                    Func1::Acos => a.acos(),
                    Func1::Atan => a.atan(),
                    Func1::Sqrt => a.sqrt(),
                    Func1::Abs => a.abs(),
                    Func1::Exp => a.exp(),
                    Func1::Ln => a.ln(),
                    Func1::Log10 => a.log10(),
                    Func1::Floor => a.floor(),
                    Func1::Ceil => a.ceil(),
                }
            }
            Node::Call2(f, a, b) => {
                let (a, b) = (a.eval(v), b.eval(v));
                match f {
                    Func2::Min => a.min(b),
                    Func2::Max => a.max(b),
                    Func2::Pow => a.powf(b),
                    Func2::Atan2 => a.atan2(b),
                }
            }
        }
    }
}

/// A parsed single-variable expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    source: String,
    root: Node,
}

impl Expr {
    pub fn parse(source: &str) -> Result<Self> {
        let mut tokens = Vec::new();
        let mut lexer = Token::lexer(source);
        while let Some(tok) = lexer.next() {
            match tok {
                Ok(t) => tokens.push(t),
                Err(()) => {
                    return Err(expr_error(
                        source,
                        format!(
                            "unexpected character `{}` at offset {}",
                            lexer.slice(),
                            lexer.span().start
                        ),
                    ));
                }
            }
        }
        if tokens.is_empty() {
            return Err(expr_error(source, "empty expression"));
        }

        let mut parser = Parser {
            source,
            tokens: &tokens,
            pos: 0,
            depth: 0,
        };
        let root = parser.expr()?;
        if let Some(tok) = parser.peek() {
            return Err(expr_error(source, format!("unexpected trailing {tok:?}")));
        }
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn eval(&self, v: f64) -> f64 {
        self.root.eval(v)
    }
}

impl std::str::FromStr for Expr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Bound on nesting plus chained operators; it also bounds the depth of the parsed tree.
const MAX_DEPTH: usize = 256;

fn expr_error(source: &str, message: impl Into<String>) -> Error {
    Error::Expression {
        source_text: source.to_string(),
        message: message.into(),
    }
}

struct Parser<'a, 's> {
    source: &'a str,
    tokens: &'a [Token<'s>],
    pos: usize,
    depth: usize,
}

impl<'s> Parser<'_, 's> {
    fn peek(&self) -> Option<Token<'s>> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token<'s>> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(expr_error(self.source, "expression nested too deeply"));
        }
        Ok(())
    }

    fn expect(&mut self, want: Token<'s>) -> Result<()> {
        match self.bump() {
            Some(tok) if tok == want => Ok(()),
            Some(tok) => Err(expr_error(
                self.source,
                format!("expected {want:?}, found {tok:?}"),
            )),
            None => Err(expr_error(
                self.source,
                format!("expected {want:?}, found end of input"),
            )),
        }
    }

    // Each chained operator nests the left operand one level deeper.
    fn expr(&mut self) -> Result<Node> {
        let depth = self.depth;
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => {
                    self.depth = depth;
                    return Ok(lhs);
                }
            };
            self.pos += 1;
            self.descend()?;
            let rhs = self.term()?;
            lhs = Node::Bin(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn term(&mut self) -> Result<Node> {
        let depth = self.depth;
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => {
                    self.depth = depth;
                    return Ok(lhs);
                }
            };
            self.pos += 1;
            self.descend()?;
            let rhs = self.unary()?;
            lhs = Node::Bin(op, Box::new(lhs), Box::new(rhs));
        }
    }

    // Unary minus binds looser than `^`: `-x^2` is `-(x^2)`.
    fn unary(&mut self) -> Result<Node> {
        self.descend()?;
        let node = match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Node::Neg(Box::new(self.unary()?))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()?
            }
            _ => self.power()?,
        };
        self.depth -= 1;
        Ok(node)
    }

    fn power(&mut self) -> Result<Node> {
        let base = self.atom()?;
        if self.peek() == Some(Token::Caret) {
            self.pos += 1;
            let exp = self.unary()?;
            return Ok(Node::Bin(BinOp::Pow, Box::new(base), Box::new(exp)));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Node> {
        match self.bump() {
            Some(Token::Number(n)) => Ok(Node::Num(n)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                if self.peek() == Some(Token::LParen) {
                    self.pos += 1;
                    return self.call(name);
                }
                match name {
                    "x" | "t" => Ok(Node::Var),
                    "pi" => Ok(Node::Num(std::f64::consts::PI)),
                    "e" => Ok(Node::Num(std::f64::consts::E)),
                    other => Err(expr_error(
                        self.source,
                        format!("unknown identifier `{other}`"),
                    )),
                }
            }
            Some(tok) => Err(expr_error(self.source, format!("unexpected {tok:?}"))),
            None => Err(expr_error(self.source, "unexpected end of input")),
        }
    }

    fn call(&mut self, name: &str) -> Result<Node> {
        let mut args = Vec::new();
        if self.peek() != Some(Token::RParen) {
            loop {
                args.push(self.expr()?);
                if self.peek() == Some(Token::Comma) {
                    self.pos += 1;
                    continue;
                }
                break;
            }
        }
        self.expect(Token::RParen)?;

        let unary = match name {
            "sin" => Some(Func1::Sin),
            "cos" => Some(Func1::Cos),
            "tan" => Some(Func1::Tan),
            "asin" => Some(Func1::Asin),
            "acos" => Some(Func1::Acos),
            "atan" => Some(Func1::Atan),
            "sqrt" => Some(Func1::Sqrt),
            "abs" => Some(Func1::Abs),
            "exp" => Some(Func1::Exp),
            "ln" | "log" => Some(Func1::Ln),
            "log10" => Some(Func1::Log10),
            "floor" => Some(Func1::Floor),
            "ceil" => Some(Func1::Ceil),
            _ => None,
        };
        let binary = match name {
            "min" => Some(Func2::Min),
            "max" => Some(Func2::Max),
            "pow" => Some(Func2::Pow),
            "atan2" => Some(Func2::Atan2),
            _ => None,
        };

        let arity = args.len();
        let mut args = args.into_iter();
        match (unary, binary, args.next(), args.next()) {
            (Some(f), _, Some(a), None) => Ok(Node::Call1(f, Box::new(a))),
            (_, Some(f), Some(a), Some(b)) if arity == 2 => {
                Ok(Node::Call2(f, Box::new(a), Box::new(b)))
            }
            (None, None, ..) => Err(expr_error(
                self.source,
                format!("unknown function `{name}`"),
            )),
            _ => Err(expr_error(
                self.source,
                format!("wrong number of arguments for `{name}`: {arity}"),
            )),
        }
    }
}

/// A real function of one variable, either parsed from configuration or supplied natively.
#[derive(Clone)]
pub enum CurveFn {
    Expr(Expr),
    Native(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl CurveFn {
    pub fn parse(source: &str) -> Result<Self> {
        Ok(Self::Expr(Expr::parse(source)?))
    }

    pub fn native(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Native(Arc::new(f))
    }

    pub fn constant(value: f64) -> Self {
        Self::Expr(Expr {
            source: crate::format::js_number(value),
            root: Node::Num(value),
        })
    }

    pub fn identity() -> Self {
        Self::Expr(Expr {
            source: "t".to_string(),
            root: Node::Var,
        })
    }

    pub fn eval(&self, v: f64) -> f64 {
        match self {
            CurveFn::Expr(e) => e.eval(v),
            CurveFn::Native(f) => f(v),
        }
    }
}

impl fmt::Debug for CurveFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveFn::Expr(e) => f.debug_tuple("Expr").field(&e.source).finish(),
            CurveFn::Native(_) => f.write_str("Native(..)"),
        }
    }
}

impl Serialize for CurveFn {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CurveFn::Expr(e) => serializer.serialize_str(&e.source),
            CurveFn::Native(_) => serializer.serialize_str("<native>"),
        }
    }
}

impl<'de> Deserialize<'de> for CurveFn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => CurveFn::parse(&s).map_err(serde::de::Error::custom),
            Raw::Number(n) => Ok(CurveFn::constant(n)),
        }
    }
}
