//! A plain problem representation, ready to be written in the .lp format.
//! [crate::lp_model::LpModel::to_problem] produces one.
use std::fmt;
use std::fmt::Formatter;

use crate::lp_format::{AsVariable, Constraint, LpObjective, LpProblem, WriteToLpFileFormat};
use crate::model::VarType;

/// A weighted sum of named variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpression {
    /// `(coefficient, variable name)` pairs
    pub terms: Vec<(f64, String)>,
}

/// A variable to optimize
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// The variable name should be unique in the problem and have a name accepted by the solver
    pub name: String,
    /// continuous, integer or binary
    pub var_type: VarType,
    /// -INFINITY if there is no lower bound
    pub lower_bound: f64,
    /// INFINITY if there is no upper bound
    pub upper_bound: f64,
}

impl WriteToLpFileFormat for LinearExpression {
    fn to_lp_file_format(&self, f: &mut Formatter) -> fmt::Result {
        for (idx, (coefficient, name)) in self.terms.iter().enumerate() {
            let sign = if *coefficient < 0.0 { "-" } else { "+" };
            match (idx, sign) {
                (0, "+") => {}
                (0, _) => write!(f, "{} ", sign)?,
                _ => write!(f, " {} ", sign)?,
            }
            let magnitude = coefficient.abs();
            if magnitude != 1.0 {
                write!(f, "{} ", magnitude)?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

impl AsVariable for Variable {
    fn name(&self) -> &str {
        &self.name
    }

    fn var_type(&self) -> VarType {
        self.var_type
    }

    fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    fn upper_bound(&self) -> f64 {
        self.upper_bound
    }
}

/// A complete problem: objective, variables and constraints
pub struct Problem<EXPR = LinearExpression, VAR = Variable> {
    /// problem name, used as a comment and a temporary file prefix
    pub name: String,
    /// whether to minimize or maximize
    pub sense: LpObjective,
    /// objective function
    pub objective: EXPR,
    /// all variables
    pub variables: Vec<VAR>,
    /// all constraints
    pub constraints: Vec<Constraint<EXPR>>,
}

impl<'a, EXPR: 'a, VAR: 'a> LpProblem<'a> for Problem<EXPR, VAR>
where
    &'a VAR: AsVariable,
    &'a EXPR: WriteToLpFileFormat,
{
    type Variable = &'a VAR;
    type Expression = &'a EXPR;
    type ConstraintIterator = Box<dyn Iterator<Item = Constraint<&'a EXPR>> + 'a>;
    type VariableIterator = std::slice::Iter<'a, VAR>;

    fn name(&self) -> &str {
        &self.name
    }

    fn variables(&'a self) -> Self::VariableIterator {
        self.variables.iter()
    }

    fn objective(&'a self) -> Self::Expression {
        &self.objective
    }

    fn sense(&self) -> LpObjective {
        self.sense
    }

    fn constraints(&'a self) -> Self::ConstraintIterator {
        Box::new(self.constraints.iter().map(
            |Constraint {
                 name,
                 lhs,
                 operator,
                 rhs,
             }| Constraint {
                name: name.clone(),
                lhs,
                operator: *operator,
                rhs: *rhs,
            },
        ))
    }
}
