//! Auto solvers automatically find which of their child solvers is installed on
//! the user's computer and uses it. The [AllSolvers] solvers tries all the supported solvers.

use crate::lp_format::{LpObjective, LpProblem};
use crate::model::VarType;
use crate::problem::{LinearExpression, Problem, Variable};
#[cfg(feature = "cplex")]
use crate::solvers::cplex::Cplex;
use crate::solvers::{CbcSolver, GlpkSolver, GurobiSolver, Solution, SolverError};

use tracing::debug;

use super::SolverTrait;

/// A solver that tries multiple solvers
#[derive(Debug, Clone)]
pub struct AutoSolver<SOLVER, NEXT>(SOLVER, NEXT);

/// The tail of a list of solvers. This one has no children and never finds any solver.
#[derive(Debug, Clone, Default)]
pub struct NoSolver;

#[cfg(not(feature = "cplex"))]
type Cplex = NoSolver;

/// An [AutoSolver] that tries, in order: Gurobi, Cplex, Cbc and Glpk
pub type AllSolvers = AutoSolver<
    GurobiSolver,
    AutoSolver<Cplex, AutoSolver<CbcSolver, AutoSolver<GlpkSolver, NoSolver>>>,
>;

impl SolverTrait for NoSolver {
    fn run<'a, P: LpProblem<'a>>(&self, _problem: &'a P) -> Result<Solution, SolverError> {
        Err(SolverError::NotAvailable)
    }
}

/// The default AutoSolver contains all supported solvers
impl<A: Default, B: Default> Default for AutoSolver<A, B> {
    fn default() -> Self {
        AutoSolver(A::default(), B::default())
    }
}

impl<SOLVER: Default, NEXT: Default> AutoSolver<SOLVER, NEXT> {
    /// Instantiate an AutoSolver with all supported solvers
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate an AutoSolver with the given solvers
    pub fn with_solver<NewSolver>(self, solver: NewSolver) -> AutoSolver<NewSolver, Self> {
        AutoSolver(solver, self)
    }
}

fn probe_problem() -> Problem {
    Problem {
        name: "probe".to_string(),
        sense: LpObjective::Minimize,
        objective: LinearExpression {
            terms: vec![(1.0, "x".to_string())],
        },
        variables: vec![Variable {
            name: "x".to_string(),
            var_type: VarType::Continuous,
            lower_bound: 0.0,
            upper_bound: 1.0,
        }],
        constraints: vec![],
    }
}

impl<S: SolverTrait, T: SolverTrait> SolverTrait for AutoSolver<S, T> {
    fn run<'a, P: LpProblem<'a>>(&self, problem: &'a P) -> Result<Solution, SolverError> {
        // a tiny problem tells whether the solver is installed
        // without writing the real one to disk
        let works = match self.0.run(&probe_problem()) {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "solver unavailable, trying the next one");
                false
            }
        };
        if works {
            self.0.run(problem)
        } else {
            self.1.run(problem)
        }
    }
}
