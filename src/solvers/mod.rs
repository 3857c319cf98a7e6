//! This module provides the interface to different solvers.
//!
//! All of them are external programs that need to be installed on your
//! system: the problem is written to a temporary .lp file, the solver binary
//! is run on it, and the solution file it writes is parsed back.
//! [CbcSolver], [GlpkSolver] and [GurobiSolver] are always available; the
//! IBM CPLEX solver needs the `cplex` feature. [AllSolvers] picks the first
//! one that is installed.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::lp_format::LpProblem;

pub use self::auto::*;
pub use self::cbc::*;
#[cfg(feature = "cplex")]
pub use self::cplex::*;
pub use self::glpk::*;
pub use self::gurobi::*;

pub mod auto;
pub mod cbc;
#[cfg(feature = "cplex")]
pub mod cplex;
pub mod glpk;
pub mod gurobi;

/// Errors raised while running an external solver
#[derive(Debug, Error)]
pub enum SolverError {
    /// The problem could not be written to disk
    #[error("unable to create {solver} problem file: {source}")]
    ProblemFile {
        /// solver command
        solver: String,
        /// underlying error
        source: io::Error,
    },

    /// The solver program could not be started
    #[error("error running {command}: {source}")]
    Command {
        /// solver command
        command: String,
        /// underlying error
        source: io::Error,
    },

    /// The solver program exited with an error
    #[error("{command} failed: {status}")]
    Failed {
        /// solver command
        command: String,
        /// exit status of the program
        status: ExitStatus,
    },

    /// The solution file could not be opened
    #[error("cannot open solution file {path:?}: {source}")]
    SolutionFile {
        /// path of the solution file
        path: PathBuf,
        /// underlying error
        source: io::Error,
    },

    /// The solution file does not have the expected layout
    #[error("incorrect solution format: {0}")]
    Format(String),

    /// None of the solvers is installed
    #[error("no solver available")]
    NotAvailable,

    /// Any other I/O error
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Outcome of a solver run
#[derive(Debug, PartialEq, Clone)]
pub enum Status {
    /// an optimal solution was found
    Optimal,
    /// a solution was found, but it may not be optimal
    SubOptimal,
    /// no solution exists
    Infeasible,
    /// the objective can be improved indefinitely
    Unbounded,
    /// the solver stopped without a conclusion
    NotSolved,
}

/// Status and variable values read from a solver
#[derive(Debug, Clone)]
pub struct Solution {
    /// outcome of the run
    pub status: Status,
    /// value of each variable, by .lp name
    pub results: HashMap<String, f64>,
}

impl Solution {
    /// a new solution
    pub fn new(status: Status, results: HashMap<String, f64>) -> Solution {
        Solution { status, results }
    }
}

/// A solver that can solve problems in the .lp format
pub trait SolverTrait {
    /// Solve the problem
    fn run<'a, P: LpProblem<'a>>(&self, problem: &'a P) -> Result<Solution, SolverError>;
}

/// A solver that writes its results to a file
pub trait SolverWithSolutionParsing {
    /// Read and remove the solution file
    fn read_solution<'a, P: LpProblem<'a>>(
        &self,
        temp_solution_file: &Path,
        problem: Option<&'a P>,
    ) -> Result<Solution, SolverError> {
        match File::open(temp_solution_file) {
            Ok(f) => {
                let res = self.read_specific_solution(&f, problem)?;
                let _ = fs::remove_file(temp_solution_file);
                Ok(res)
            }
            Err(source) => Err(SolverError::SolutionFile {
                path: temp_solution_file.to_path_buf(),
                source,
            }),
        }
    }
    /// Parse the solver specific solution format
    fn read_specific_solution<'a, P: LpProblem<'a>>(
        &self,
        f: &File,
        problem: Option<&'a P>,
    ) -> Result<Solution, SolverError>;
}

/// A solver with a time limit
pub trait WithMaxSeconds<T> {
    /// the time limit, if any
    fn max_seconds(&self) -> Option<u32>;
    /// a copy of the solver with the given time limit
    fn with_max_seconds(&self, seconds: u32) -> T;
}

/// A solver that can use several threads
pub trait WithNbThreads<T> {
    /// the thread count, if set
    fn nb_threads(&self) -> Option<u32>;
    /// a copy of the solver using the given number of threads
    fn with_nb_threads(&self, threads: u32) -> T;
}

/// A solver run as a command line program
pub trait SolverProgram {
    /// name of the executable
    fn command_name(&self) -> &str;
    /// command line arguments
    fn arguments(&self, lp_file: &Path, solution_file: &Path) -> Vec<OsString>;
    /// where to write the solution. A temporary file is used if `None`
    fn preferred_temp_solution_file(&self) -> Option<&Path> {
        None
    }
    /// Detect the status from the program output, for solvers that do not
    /// write a solution file in some cases
    fn parse_stdout_status(&self, _stdout: &[u8]) -> Option<Status> {
        None
    }
    /// extension of the solution file, which some solvers use to pick the format
    fn solution_suffix(&self) -> Option<&str> {
        None
    }
}

impl<T: SolverWithSolutionParsing + SolverProgram> SolverTrait for T {
    fn run<'a, P: LpProblem<'a>>(&self, problem: &'a P) -> Result<Solution, SolverError> {
        let command_name = self.command_name();
        let file_model = problem
            .to_tmp_file()
            .map_err(|source| SolverError::ProblemFile {
                solver: command_name.to_string(),
                source,
            })?;

        let temp_solution_file = tempfile::Builder::new()
            .prefix(problem.name())
            .suffix(self.solution_suffix().unwrap_or(".sol"))
            .tempfile()?
            .into_temp_path();
        let solution_file = self
            .preferred_temp_solution_file()
            .unwrap_or(&temp_solution_file);

        let arguments = self.arguments(file_model.path(), solution_file);
        info!(command = command_name, problem = problem.name(), "running solver");
        debug!(?arguments, "solver arguments");
        let output = Command::new(command_name)
            .args(&arguments)
            .output()
            .map_err(|source| SolverError::Command {
                command: command_name.to_string(),
                source,
            })?;

        if !output.status.success() {
            warn!(command = command_name, status = %output.status, "solver failed");
            return Err(SolverError::Failed {
                command: command_name.to_string(),
                status: output.status,
            });
        }

        let status = self.parse_stdout_status(&output.stdout);
        if let Some(s @ Status::Infeasible)
        | Some(s @ Status::Unbounded)
        | Some(s @ Status::NotSolved) = status.clone()
        {
            info!(command = command_name, status = ?s, "solver found no solution");
            return Ok(Solution::new(s, HashMap::new()));
        }
        let mut solution = self.read_solution(solution_file, Some(problem))?;
        if let Some(status) = status {
            solution.status = status;
        }
        info!(command = command_name, status = ?solution.status, "solver finished");
        Ok(solution)
    }
}
