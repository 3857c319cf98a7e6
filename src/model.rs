//! The interface to an optimization model.
//!
//! Tables only ever talk to a model through the [Model] trait: a batched
//! variable creation, a single linear constraint creation, and attribute
//! queries on the returned handles. [crate::lp_model::LpModel] implements it
//! on top of the .lp file format and external solvers.
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::FrameError;
use crate::linear::LinExpr;
use crate::table::{IndexKey, Scalar};

/// Common attribute names understood by [crate::lp_model::LpModel].
/// Other models may accept more.
pub mod attr {
    /// Value of a variable in the current solution
    pub const X: &str = "X";
    /// Lower bound of a variable
    pub const LB: &str = "LB";
    /// Upper bound of a variable
    pub const UB: &str = "UB";
    /// Objective coefficient of a variable
    pub const OBJ: &str = "Obj";
    /// Name of a variable
    pub const VAR_NAME: &str = "VarName";
    /// Type of a variable: "C", "I" or "B"
    pub const VTYPE: &str = "VType";
    /// Name of a constraint
    pub const CONSTR_NAME: &str = "ConstrName";
    /// Sense of a constraint: "<", ">" or "="
    pub const SENSE: &str = "Sense";
    /// Right-hand side of a constraint, once variables are moved to the left
    pub const RHS: &str = "RHS";
    /// `RHS - activity` of a constraint in the current solution
    pub const SLACK: &str = "Slack";
}

/// Type of a decision variable
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarType {
    /// real valued
    Continuous,
    /// integer valued
    Integer,
    /// 0 or 1
    Binary,
}

impl Default for VarType {
    fn default() -> Self {
        VarType::Continuous
    }
}

impl VarType {
    /// One letter code, as reported by the `VType` attribute
    pub fn code(self) -> &'static str {
        match self {
            VarType::Continuous => "C",
            VarType::Integer => "I",
            VarType::Binary => "B",
        }
    }
}

/// Relation between the two sides of a linear constraint
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    /// `<=`
    Less,
    /// `>=`
    Greater,
    /// `=`
    Equal,
}

impl Sense {
    /// The sense as an ordering of the left-hand side relative to the right-hand side
    pub fn ordering(self) -> Ordering {
        match self {
            Sense::Less => Ordering::Less,
            Sense::Greater => Ordering::Greater,
            Sense::Equal => Ordering::Equal,
        }
    }

    /// One character code, as reported by the `Sense` attribute
    pub fn code(self) -> &'static str {
        match self {
            Sense::Less => "<",
            Sense::Greater => ">",
            Sense::Equal => "=",
        }
    }
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sense::Less => "<=",
            Sense::Greater => ">=",
            Sense::Equal => "=",
        })
    }
}

impl FromStr for Sense {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" | "<=" | "=<" => Ok(Sense::Less),
            ">" | ">=" | "=>" => Ok(Sense::Greater),
            "=" | "==" => Ok(Sense::Equal),
            other => Err(FrameError::UnknownSense(other.to_string())),
        }
    }
}

/// An optimization model that variables and constraints can be added to.
///
/// Handles returned by the model are stored in table cells, so they should be
/// cheap to clone.
pub trait Model {
    /// Handle to a variable of the model
    type Var: Clone + fmt::Debug + PartialEq;
    /// Handle to a constraint of the model
    type Constr: Clone + fmt::Debug + PartialEq;
    /// Error raised by the model
    type Error: std::error::Error + Send + Sync + 'static;

    /// Add one variable per key, in order. `lb` and `ub` hold one bound per key.
    /// Named variables are called `name[key]`; unnamed ones get a default name.
    fn add_vars(
        &mut self,
        keys: &[IndexKey],
        name: Option<&str>,
        lb: &[f64],
        ub: &[f64],
        vtype: VarType,
    ) -> Result<Vec<Self::Var>, Self::Error>;

    /// Add the constraint `lhs sense rhs`
    fn add_lconstr(
        &mut self,
        lhs: LinExpr<Self::Var>,
        sense: Sense,
        rhs: LinExpr<Self::Var>,
        name: &str,
    ) -> Result<Self::Constr, Self::Error>;

    /// Query an attribute of a variable
    fn var_attr(&self, var: &Self::Var, attr: &str) -> Result<Scalar, Self::Error>;

    /// Query an attribute of a constraint
    fn constr_attr(&self, constr: &Self::Constr, attr: &str) -> Result<Scalar, Self::Error>;
}
