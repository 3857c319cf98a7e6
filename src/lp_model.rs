//! An in-memory [Model] solved by external programs.
//!
//! [LpModel] records variables and constraints, renders them as a
//! [Problem] in the .lp format and hands that to any [SolverTrait].
//! The values found by the solver are then available through the `X` and
//! `Slack` attributes.
//!
//! ```
//! use lp_frames::linear::LinExpr;
//! use lp_frames::lp_format::{LpObjective, LpProblem};
//! use lp_frames::lp_model::LpModel;
//! use lp_frames::model::{Model, Sense, VarType};
//! use lp_frames::table::{IndexKey, Scalar};
//!
//! let mut model = LpModel::new("small");
//! let keys = vec![IndexKey::Label(Scalar::Int(0)), IndexKey::Label(Scalar::Int(1))];
//! let x = model
//!     .add_vars(&keys, Some("x"), &[0.0, 0.0], &[1.0, 1.0], VarType::Continuous)
//!     .unwrap();
//! let total = LinExpr::from(x[0]) + LinExpr::from(x[1]);
//! model
//!     .add_lconstr(total.clone(), Sense::Less, LinExpr::from_constant(1.5), "cap")
//!     .unwrap();
//! model.set_objective(total, LpObjective::Maximize);
//!
//! let lp = model.to_problem().display_lp().to_string();
//! assert!(lp.contains("cap: x_0_ + x_1_ <= 1.5"));
//! ```
use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{debug, info};

use crate::linear::LinExpr;
use crate::lp_format::{Constraint, LpObjective};
use crate::model::{attr, Model, Sense, VarType};
use crate::problem::{LinearExpression, Problem, Variable};
use crate::solvers::{Solution, SolverError, SolverTrait, Status};
use crate::table::{IndexKey, Scalar, Series, Table};
use crate::util::UniqueNameGenerator;

/// Handle to a variable of an [LpModel]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LpVar(usize);

/// Handle to a constraint of an [LpModel]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LpConstr(usize);

impl LpVar {
    /// position of the variable in the model
    pub fn index(self) -> usize {
        self.0
    }
}

impl LpConstr {
    /// position of the constraint in the model
    pub fn index(self) -> usize {
        self.0
    }
}

/// A table whose cells may hold [LpModel] handles
pub type LpTable = Table<LpVar, LpConstr>;

/// A series whose cells may hold [LpModel] handles
pub type LpSeries = Series<LpVar, LpConstr>;

/// Errors raised by [LpModel]
#[derive(Debug, Error)]
pub enum ModelError {
    /// A variable or constraint with this name already exists
    #[error("duplicate name: {0}")]
    DuplicateName(String),

    /// The lower bound is above the upper bound, or one of them is NaN
    #[error("invalid bounds for {name}: [{lb}, {ub}]")]
    InvalidBounds {
        /// variable name
        name: String,
        /// lower bound
        lb: f64,
        /// upper bound
        ub: f64,
    },

    /// The attribute does not exist for this kind of handle
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// The attribute needs a solution, and the model has none
    #[error("no solution available for attribute {0}")]
    NoSolution(String),

    /// The handle does not belong to this model
    #[error("unknown variable or constraint #{0}")]
    UnknownVariable(usize),

    /// The bounds of a batch do not match its keys
    #[error("expected {expected} bounds, found {found}")]
    BoundCount {
        /// number of keys
        expected: usize,
        /// number of bounds
        found: usize,
    },

    /// The solver failed
    #[error(transparent)]
    Solver(#[from] SolverError),
}

#[derive(Debug, Clone)]
struct VarData {
    name: String,
    lp_name: String,
    lb: f64,
    ub: f64,
    vtype: VarType,
}

#[derive(Debug, Clone)]
struct ConstrData {
    name: String,
    lp_name: String,
    terms: Vec<(f64, LpVar)>,
    sense: Sense,
    rhs: f64,
}

#[derive(Debug, Clone)]
struct SolvedValues {
    status: Status,
    values: Vec<f64>,
}

/// A model kept in memory, solved by writing a .lp file
#[derive(Debug, Default)]
pub struct LpModel {
    name: String,
    sense: LpObjective,
    objective: LinExpr<LpVar>,
    vars: Vec<VarData>,
    constrs: Vec<ConstrData>,
    var_names: HashSet<String>,
    constr_names: HashSet<String>,
    var_lp_names: UniqueNameGenerator,
    constr_lp_names: UniqueNameGenerator,
    solution: Option<SolvedValues>,
}

impl LpModel {
    /// An empty model. The name is used for the temporary problem files.
    pub fn new<S: Into<String>>(name: S) -> LpModel {
        LpModel {
            name: name.into(),
            ..LpModel::default()
        }
    }

    /// model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the function to optimize
    pub fn set_objective(&mut self, objective: LinExpr<LpVar>, sense: LpObjective) {
        self.objective = objective.simplify();
        self.sense = sense;
        self.solution = None;
    }

    /// number of variables
    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    /// number of constraints
    pub fn num_constrs(&self) -> usize {
        self.constrs.len()
    }

    /// Status of the last solve, if the model has not changed since
    pub fn status(&self) -> Option<&Status> {
        self.solution.as_ref().map(|s| &s.status)
    }

    /// Objective value of the stored solution
    pub fn objective_value(&self) -> Option<f64> {
        let solution = self.solution.as_ref()?;
        self.objective
            .value(|v| {
                solution
                    .values
                    .get(v.0)
                    .copied()
                    .ok_or(ModelError::UnknownVariable(v.0))
            })
            .ok()
    }

    /// Name of the variable in the .lp file
    pub fn lp_name(&self, var: &LpVar) -> Result<&str, ModelError> {
        Ok(&self.var(var)?.lp_name)
    }

    fn var(&self, var: &LpVar) -> Result<&VarData, ModelError> {
        self.vars.get(var.0).ok_or(ModelError::UnknownVariable(var.0))
    }

    fn constr(&self, constr: &LpConstr) -> Result<&ConstrData, ModelError> {
        self.constrs
            .get(constr.0)
            .ok_or(ModelError::UnknownVariable(constr.0))
    }

    fn linear_expression(&self, terms: &[(f64, LpVar)]) -> LinearExpression {
        let mut terms: Vec<(f64, String)> = terms
            .iter()
            .filter_map(|(c, v)| self.vars.get(v.0).map(|data| (*c, data.lp_name.clone())))
            .collect();
        // rows and objectives need at least one term to be valid .lp
        if terms.is_empty() {
            if let Some(first) = self.vars.first() {
                terms.push((0.0, first.lp_name.clone()));
            }
        }
        LinearExpression { terms }
    }

    /// The model as a problem that can be written in the .lp format
    pub fn to_problem(&self) -> Problem {
        Problem {
            name: self.name.clone(),
            sense: self.sense,
            objective: self.linear_expression(self.objective.terms()),
            variables: self
                .vars
                .iter()
                .map(|v| Variable {
                    name: v.lp_name.clone(),
                    var_type: v.vtype,
                    lower_bound: v.lb,
                    upper_bound: v.ub,
                })
                .collect(),
            constraints: self
                .constrs
                .iter()
                .map(|c| Constraint {
                    name: c.lp_name.clone(),
                    lhs: self.linear_expression(&c.terms),
                    operator: c.sense.ordering(),
                    rhs: c.rhs,
                })
                .collect(),
        }
    }

    /// Solve the model with the given solver and store the solution
    pub fn optimize<S: SolverTrait>(&mut self, solver: &S) -> Result<Status, ModelError> {
        let problem = self.to_problem();
        info!(
            model = %self.name,
            vars = self.vars.len(),
            constrs = self.constrs.len(),
            "optimizing"
        );
        let solution = solver.run(&problem)?;
        self.apply_solution(&solution);
        Ok(solution.status)
    }

    /// Store the values of a solution, looked up by .lp name.
    /// Variables missing from the solution are 0. Solutions without an
    /// optimal or sub-optimal status only record the status.
    pub fn apply_solution(&mut self, solution: &Solution) {
        let values = match solution.status {
            Status::Optimal | Status::SubOptimal => self
                .vars
                .iter()
                .map(|v| solution.results.get(&v.lp_name).copied().unwrap_or(0.0))
                .collect(),
            _ => vec![],
        };
        debug!(status = ?solution.status, values = values.len(), "solution applied");
        self.solution = Some(SolvedValues {
            status: solution.status.clone(),
            values,
        });
    }

    /// The value of every variable in the stored solution, keyed by the
    /// name given when the variable was created
    pub fn values_by_name(&self) -> Result<HashMap<&str, f64>, ModelError> {
        self.vars
            .iter()
            .enumerate()
            .map(|(i, v)| Ok((v.name.as_str(), self.solution_value(&LpVar(i), attr::X)?)))
            .collect()
    }

    fn solution_value(&self, var: &LpVar, attr: &str) -> Result<f64, ModelError> {
        self.solution
            .as_ref()
            .and_then(|s| s.values.get(var.0).copied())
            .ok_or_else(|| ModelError::NoSolution(attr.to_string()))
    }

    fn objective_coefficient(&self, var: &LpVar) -> f64 {
        self.objective
            .terms()
            .iter()
            .filter(|(_, v)| v == var)
            .map(|(c, _)| c)
            .sum()
    }
}

fn check_bounds(name: &str, lb: f64, ub: f64) -> Result<(), ModelError> {
    let empty = lb == f64::INFINITY || ub == f64::NEG_INFINITY;
    if lb.is_nan() || ub.is_nan() || lb > ub || empty {
        return Err(ModelError::InvalidBounds {
            name: name.to_string(),
            lb,
            ub,
        });
    }
    Ok(())
}

impl Model for LpModel {
    type Var = LpVar;
    type Constr = LpConstr;
    type Error = ModelError;

    fn add_vars(
        &mut self,
        keys: &[IndexKey],
        name: Option<&str>,
        lb: &[f64],
        ub: &[f64],
        vtype: VarType,
    ) -> Result<Vec<LpVar>, ModelError> {
        for bounds in [lb, ub].iter() {
            if bounds.len() != keys.len() {
                return Err(ModelError::BoundCount {
                    expected: keys.len(),
                    found: bounds.len(),
                });
            }
        }
        let first = self.vars.len();
        let names: Vec<String> = keys
            .iter()
            .enumerate()
            .map(|(i, key)| match name {
                Some(name) => format!("{}[{}]", name, key),
                None => format!("C{}", first + i),
            })
            .collect();
        // validate the whole batch before adding anything
        let mut batch = HashSet::with_capacity(names.len());
        for (i, var_name) in names.iter().enumerate() {
            if self.var_names.contains(var_name) || !batch.insert(var_name.as_str()) {
                return Err(ModelError::DuplicateName(var_name.clone()));
            }
            check_bounds(var_name, lb[i], ub[i])?;
        }
        let mut handles = Vec::with_capacity(names.len());
        for (i, var_name) in names.into_iter().enumerate() {
            let lp_name = self.var_lp_names.add_variable(&var_name).into_owned();
            self.var_names.insert(var_name.clone());
            handles.push(LpVar(self.vars.len()));
            self.vars.push(VarData {
                name: var_name,
                lp_name,
                lb: lb[i],
                ub: ub[i],
                vtype,
            });
        }
        self.solution = None;
        debug!(count = handles.len(), "variables added");
        Ok(handles)
    }

    fn add_lconstr(
        &mut self,
        lhs: LinExpr<LpVar>,
        sense: Sense,
        rhs: LinExpr<LpVar>,
        name: &str,
    ) -> Result<LpConstr, ModelError> {
        let name = if name.is_empty() {
            format!("R{}", self.constrs.len())
        } else {
            name.to_string()
        };
        if self.constr_names.contains(&name) {
            return Err(ModelError::DuplicateName(name));
        }
        let row = (lhs - rhs).simplify();
        for (_, var) in row.terms() {
            self.var(var)?;
        }
        let lp_name = self.constr_lp_names.add_variable(&name).into_owned();
        self.constr_names.insert(name.clone());
        let handle = LpConstr(self.constrs.len());
        self.constrs.push(ConstrData {
            name,
            lp_name,
            terms: row.terms().to_vec(),
            sense,
            rhs: 0.0 - row.constant(),
        });
        self.solution = None;
        Ok(handle)
    }

    fn var_attr(&self, var: &LpVar, name: &str) -> Result<Scalar, ModelError> {
        let data = self.var(var)?;
        let value = if name.eq_ignore_ascii_case(attr::X) {
            Scalar::Float(self.solution_value(var, attr::X)?)
        } else if name.eq_ignore_ascii_case(attr::LB) {
            Scalar::Float(data.lb)
        } else if name.eq_ignore_ascii_case(attr::UB) {
            Scalar::Float(data.ub)
        } else if name.eq_ignore_ascii_case(attr::OBJ) {
            Scalar::Float(self.objective_coefficient(var))
        } else if name.eq_ignore_ascii_case(attr::VAR_NAME) {
            Scalar::Str(data.name.clone())
        } else if name.eq_ignore_ascii_case(attr::VTYPE) {
            Scalar::Str(data.vtype.code().to_string())
        } else {
            return Err(ModelError::UnknownAttribute(name.to_string()));
        };
        Ok(value)
    }

    fn constr_attr(&self, constr: &LpConstr, name: &str) -> Result<Scalar, ModelError> {
        let data = self.constr(constr)?;
        let value = if name.eq_ignore_ascii_case(attr::CONSTR_NAME) {
            Scalar::Str(data.name.clone())
        } else if name.eq_ignore_ascii_case(attr::SENSE) {
            Scalar::Str(data.sense.code().to_string())
        } else if name.eq_ignore_ascii_case(attr::RHS) {
            Scalar::Float(data.rhs)
        } else if name.eq_ignore_ascii_case(attr::SLACK) {
            let mut activity = 0.0;
            for (coefficient, var) in &data.terms {
                activity += coefficient * self.solution_value(var, attr::SLACK)?;
            }
            Scalar::Float(data.rhs - activity)
        } else {
            return Err(ModelError::UnknownAttribute(name.to_string()));
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp_format::LpProblem;

    fn keys(n: usize) -> Vec<IndexKey> {
        (0..n).map(|i| IndexKey::Label(Scalar::from(i))).collect()
    }

    #[test]
    fn rejects_inverted_bounds() {
        let mut model = LpModel::new("m");
        let err = model
            .add_vars(&keys(1), Some("x"), &[2.0], &[1.0], VarType::Continuous)
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidBounds { .. }));
        assert_eq!(model.num_vars(), 0);
    }

    #[test]
    fn rejects_infinite_empty_bounds() {
        let mut model = LpModel::new("m");
        let inf = f64::INFINITY;
        for (lb, ub) in &[(inf, inf), (-inf, -inf), (inf, 1.0)] {
            let err = model
                .add_vars(&keys(1), Some("x"), &[*lb], &[*ub], VarType::Continuous)
                .unwrap_err();
            assert!(matches!(err, ModelError::InvalidBounds { .. }));
        }
        assert_eq!(model.num_vars(), 0);
        model
            .add_vars(&keys(1), Some("x"), &[-inf], &[inf], VarType::Continuous)
            .unwrap();
        assert_eq!(model.num_vars(), 1);
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut model = LpModel::new("m");
        model
            .add_vars(&keys(2), Some("x"), &[0.0; 2], &[1.0; 2], VarType::Binary)
            .unwrap();
        let err = model
            .add_vars(&keys(1), Some("x"), &[0.0], &[1.0], VarType::Binary)
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateName(ref n) if n == "x[0]"));
    }

    #[test]
    fn constraint_constants_move_to_rhs() {
        let mut model = LpModel::new("m");
        let x = model
            .add_vars(&keys(1), None, &[0.0], &[f64::INFINITY], VarType::Continuous)
            .unwrap();
        let lhs = LinExpr::from(x[0]) + LinExpr::from_constant(2.0);
        let c = model
            .add_lconstr(lhs, Sense::Less, LinExpr::from_constant(5.0), "")
            .unwrap();
        assert_eq!(model.constr_attr(&c, "rhs").unwrap(), Scalar::Float(3.0));
        assert_eq!(
            model.constr_attr(&c, attr::CONSTR_NAME).unwrap(),
            Scalar::Str("R0".to_string())
        );
        assert_eq!(
            model.var_attr(&x[0], attr::VAR_NAME).unwrap(),
            Scalar::Str("C0".to_string())
        );
    }

    #[test]
    fn zero_rhs_is_positive_zero() {
        let mut model = LpModel::new("m");
        let x = model
            .add_vars(&keys(1), Some("x"), &[0.0], &[1.0], VarType::Continuous)
            .unwrap();
        let c = model
            .add_lconstr(
                LinExpr::from(x[0]),
                Sense::Greater,
                LinExpr::from_constant(0.0),
                "c",
            )
            .unwrap();
        match model.constr_attr(&c, attr::RHS).unwrap() {
            Scalar::Float(rhs) => assert!(rhs == 0.0 && rhs.is_sign_positive()),
            other => panic!("unexpected {:?}", other),
        }
        let lp = model.to_problem().display_lp().to_string();
        assert!(lp.contains("c: x_0_ >= 0\n"), "{}", lp);
    }

    #[test]
    fn solution_attributes() {
        let mut model = LpModel::new("m");
        let x = model
            .add_vars(&keys(2), Some("x"), &[0.0; 2], &[4.0; 2], VarType::Integer)
            .unwrap();
        let c = model
            .add_lconstr(
                LinExpr::from(x[0]) + LinExpr::from(x[1]),
                Sense::Less,
                LinExpr::from_constant(5.0),
                "cap",
            )
            .unwrap();
        assert!(matches!(
            model.var_attr(&x[0], attr::X),
            Err(ModelError::NoSolution(_))
        ));

        let mut results = HashMap::new();
        results.insert("x_0_".to_string(), 3.0);
        model.apply_solution(&Solution::new(Status::Optimal, results));
        assert_eq!(model.var_attr(&x[0], attr::X).unwrap(), Scalar::Float(3.0));
        assert_eq!(model.var_attr(&x[1], "x").unwrap(), Scalar::Float(0.0));
        assert_eq!(model.constr_attr(&c, attr::SLACK).unwrap(), Scalar::Float(2.0));
        let values = model.values_by_name().unwrap();
        assert_eq!(values.get("x[0]"), Some(&3.0));
        assert_eq!(values.get("x[1]"), Some(&0.0));
        assert!(matches!(
            model.var_attr(&x[0], "Pi"),
            Err(ModelError::UnknownAttribute(_))
        ));
    }
}
