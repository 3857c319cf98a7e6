//! Parsing and evaluation of constraint expressions such as `x + y <= cap`.
//!
//! Only a small linear grammar is accepted: numbers, column names (bare, or
//! quoted with backticks when they contain spaces), `+ - * /`, parentheses,
//! and exactly one relational operator. Nothing in the string is executed.
use std::fmt;

use pest::iterators::Pairs;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;

use crate::error::{FrameError, Result};
use crate::linear::LinExpr;
use crate::model::Sense;
use crate::table::Table;

#[allow(missing_docs)]
mod grammar {
    use pest_derive::Parser;

    #[derive(Parser)]
    #[grammar = "constraint.pest"]
    pub struct ComparisonParser;
}

use grammar::ComparisonParser;
pub use grammar::Rule;

/// Arithmetic operator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

/// One side of a comparison
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// numeric literal
    Number(f64),
    /// reference to a column of the table
    Column(String),
    /// `-expr`
    Neg(Box<Expr>),
    /// `left op right`
    Binary {
        /// left operand
        left: Box<Expr>,
        /// operator
        op: BinaryOp,
        /// right operand
        right: Box<Expr>,
    },
}

/// A parsed `lhs sense rhs` expression
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    /// left-hand side
    pub lhs: Expr,
    /// relational operator
    pub sense: Sense,
    /// right-hand side
    pub rhs: Expr,
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Column(name) => write!(f, "{}", name),
            Expr::Neg(e) => write!(f, "-({})", e),
            Expr::Binary { left, op, right } => {
                let op = match op {
                    BinaryOp::Add => "+",
                    BinaryOp::Sub => "-",
                    BinaryOp::Mul => "*",
                    BinaryOp::Div => "/",
                };
                write!(f, "({} {} {})", left, op, right)
            }
        }
    }
}

/// Parse a comparison with exactly one relational operator
///
/// ```
/// use lp_frames::model::Sense;
/// use lp_frames::parse::{parse_comparison, Expr};
///
/// let c = parse_comparison("x <= `max load`").unwrap();
/// assert_eq!(c.sense, Sense::Less);
/// assert_eq!(c.rhs, Expr::Column("max load".to_string()));
/// assert!(parse_comparison("x <= y <= z").is_err());
/// ```
pub fn parse_comparison(input: &str) -> Result<Comparison> {
    let pratt = PrattParser::new()
        .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::subtract, Assoc::Left))
        .op(Op::infix(Rule::multiply, Assoc::Left) | Op::infix(Rule::divide, Assoc::Left))
        .op(Op::prefix(Rule::neg));

    let mut lhs = None;
    let mut sense = None;
    let mut rhs = None;
    for pair in ComparisonParser::parse(Rule::comparison, input)?.flat_map(|p| p.into_inner()) {
        match pair.as_rule() {
            Rule::expr if lhs.is_none() => lhs = Some(build_expr(pair.into_inner(), &pratt)?),
            Rule::expr => rhs = Some(build_expr(pair.into_inner(), &pratt)?),
            Rule::sense => sense = Some(pair.as_str().parse()?),
            _ => {}
        }
    }
    match (lhs, sense, rhs) {
        (Some(lhs), Some(sense), Some(rhs)) => Ok(Comparison { lhs, sense, rhs }),
        _ => unreachable!("the grammar requires both sides and a sense"),
    }
}

fn build_expr(pairs: Pairs<Rule>, pratt: &PrattParser<Rule>) -> Result<Expr> {
    pratt
        .map_primary(|primary| match primary.as_rule() {
            Rule::number => primary
                .as_str()
                .parse()
                .map(Expr::Number)
                .map_err(|_| FrameError::NotNumeric(primary.as_str().to_string())),
            Rule::name => Ok(Expr::Column(primary.as_str().to_string())),
            Rule::quoted => {
                let quoted = primary.as_str();
                Ok(Expr::Column(quoted[1..quoted.len() - 1].to_string()))
            }
            Rule::expr => build_expr(primary.into_inner(), pratt),
            rule => unreachable!("unexpected operand {:?}", rule),
        })
        .map_prefix(|op, operand| match op.as_rule() {
            Rule::neg => Ok(Expr::Neg(Box::new(operand?))),
            rule => unreachable!("unexpected prefix {:?}", rule),
        })
        .map_infix(|left, op, right| {
            let op = match op.as_rule() {
                Rule::add => BinaryOp::Add,
                Rule::subtract => BinaryOp::Sub,
                Rule::multiply => BinaryOp::Mul,
                Rule::divide => BinaryOp::Div,
                rule => unreachable!("unexpected operator {:?}", rule),
            };
            Ok(Expr::Binary {
                left: Box::new(left?),
                op,
                right: Box::new(right?),
            })
        })
        .parse(pairs)
}

impl Expr {
    /// Names of the columns the expression reads
    pub fn columns(&self) -> Vec<&str> {
        let mut names = vec![];
        self.collect_columns(&mut names);
        names
    }

    fn collect_columns<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expr::Number(_) => {}
            Expr::Column(name) => names.push(name),
            Expr::Neg(e) => e.collect_columns(names),
            Expr::Binary { left, right, .. } => {
                left.collect_columns(names);
                right.collect_columns(names);
            }
        }
    }

    /// Evaluate the expression on one row of the table
    pub fn evaluate<V, C>(&self, table: &Table<V, C>, row: usize) -> Result<LinExpr<V>>
    where
        V: Clone + fmt::Debug,
        C: fmt::Debug,
    {
        match self {
            Expr::Number(n) => Ok(LinExpr::from_constant(*n)),
            Expr::Column(name) => table.values(name)?[row].to_lin_expr(),
            Expr::Neg(e) => Ok(-e.evaluate(table, row)?),
            Expr::Binary { left, op, right } => {
                let l = left.evaluate(table, row)?;
                let r = right.evaluate(table, row)?;
                match op {
                    BinaryOp::Add => Ok(l + r),
                    BinaryOp::Sub => Ok(l - r),
                    BinaryOp::Mul if r.is_constant() => Ok(l * r.constant()),
                    BinaryOp::Mul if l.is_constant() => Ok(r * l.constant()),
                    BinaryOp::Mul => Err(FrameError::NotLinear(self.to_string())),
                    BinaryOp::Div if !r.is_constant() => {
                        Err(FrameError::NotLinear(self.to_string()))
                    }
                    BinaryOp::Div if r.constant() == 0.0 => Err(FrameError::DivisionByZero),
                    BinaryOp::Div => Ok(l / r.constant()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str) -> Box<Expr> {
        Box::new(Expr::Column(name.to_string()))
    }

    #[test]
    fn precedence() {
        let c = parse_comparison("a + 2 * b >= -c").unwrap();
        assert_eq!(
            c.lhs,
            Expr::Binary {
                left: col("a"),
                op: BinaryOp::Add,
                right: Box::new(Expr::Binary {
                    left: Box::new(Expr::Number(2.0)),
                    op: BinaryOp::Mul,
                    right: col("b"),
                }),
            }
        );
        assert_eq!(c.sense, Sense::Greater);
        assert_eq!(c.rhs, Expr::Neg(col("c")));
    }

    #[test]
    fn all_senses() {
        for (text, sense) in [
            ("<", Sense::Less),
            ("<=", Sense::Less),
            ("=<", Sense::Less),
            (">", Sense::Greater),
            (">=", Sense::Greater),
            ("=>", Sense::Greater),
            ("=", Sense::Equal),
            ("==", Sense::Equal),
        ]
        .iter()
        {
            let c = parse_comparison(&format!("x {} 1.5", text)).unwrap();
            assert_eq!(c.sense, *sense, "{}", text);
            assert_eq!(c.rhs, Expr::Number(1.5));
        }
    }

    #[test]
    fn wrong_operator_count() {
        assert!(matches!(parse_comparison("x + y"), Err(FrameError::Parse(_))));
        assert!(matches!(parse_comparison("x <= y <= z"), Err(FrameError::Parse(_))));
        assert!(matches!(parse_comparison("x <> y"), Err(FrameError::Parse(_))));
    }

    #[test]
    fn rejects_code() {
        assert!(parse_comparison("__import__('os') <= 1").is_err());
        assert!(parse_comparison("x.sum() <= 1").is_err());
        assert!(parse_comparison("2x <= 1").is_err());
    }

    #[test]
    fn parenthesized_and_columns() {
        let c = parse_comparison("(a - b) / 2 == `c d`").unwrap();
        assert_eq!(c.lhs.columns(), vec!["a", "b"]);
        assert_eq!(c.rhs.columns(), vec!["c d"]);
    }
}
