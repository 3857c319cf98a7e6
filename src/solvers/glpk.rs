//! The GNU Linear Programming Kit
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader, Error};
use std::path::{Path, PathBuf};

use crate::lp_format::*;
use crate::solvers::{Solution, SolverError, SolverProgram, SolverWithSolutionParsing, Status};

/// The open source GLPK solver, run through its `glpsol` executable
#[derive(Debug, Clone)]
pub struct GlpkSolver {
    command_name: String,
    temp_solution_file: Option<PathBuf>,
}

impl Default for GlpkSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GlpkSolver {
    /// create a solver instance
    pub fn new() -> GlpkSolver {
        GlpkSolver {
            command_name: "glpsol".to_string(),
            temp_solution_file: None,
        }
    }
    /// set the name of the commandline glpk executable to use
    pub fn command_name(&self, command_name: String) -> GlpkSolver {
        GlpkSolver {
            command_name,
            temp_solution_file: self.temp_solution_file.clone(),
        }
    }
    /// write the solution to this file instead of a temporary one
    pub fn with_temp_solution_file(&self, temp_solution_file: String) -> GlpkSolver {
        GlpkSolver {
            command_name: self.command_name.clone(),
            temp_solution_file: Some(temp_solution_file.into()),
        }
    }
}

fn format_error(message: &str) -> SolverError {
    SolverError::Format(message.to_string())
}

impl SolverWithSolutionParsing for GlpkSolver {
    fn read_specific_solution<'a, P: LpProblem<'a>>(
        &self,
        f: &File,
        _problem: Option<&'a P>,
    ) -> Result<Solution, SolverError> {
        fn read_size(line: Option<Result<String, Error>>) -> Result<usize, SolverError> {
            match line {
                Some(Ok(l)) => l
                    .split_whitespace()
                    .nth(1)
                    .and_then(|value| value.parse::<usize>().ok())
                    .ok_or_else(|| format_error("invalid problem size")),
                Some(Err(e)) => Err(e.into()),
                None => Err(format_error("missing problem size")),
            }
        }
        let mut vars_value: HashMap<_, _> = HashMap::new();

        let file = BufReader::new(f);

        let mut iter = file.lines();
        let row = read_size(iter.nth(1))?;
        let col = read_size(iter.next())?;
        let status = match iter.nth(1) {
            Some(Ok(status_line)) => match status_line.get(12..).map(str::trim) {
                Some("INTEGER OPTIMAL") | Some("OPTIMAL") => Status::Optimal,
                Some("INFEASIBLE (FINAL)") | Some("INTEGER EMPTY") => Status::Infeasible,
                Some("UNDEFINED") => Status::NotSolved,
                Some("INTEGER UNDEFINED") | Some("UNBOUNDED") => Status::Unbounded,
                _ => return Err(format_error("Unknown solution status")),
            },
            Some(Err(e)) => return Err(e.into()),
            None => return Err(format_error("No solution status found")),
        };
        let mut result_lines = iter.skip(row + 7);
        for _ in 0..col {
            let line = match result_lines.next() {
                Some(l) => l?,
                None => return Err(format_error("Not all columns are present")),
            };
            let result_line: Vec<_> = line.split_whitespace().collect();
            if result_line.len() >= 4 {
                // the status column holds `*` for integer columns
                let value = result_line[3]
                    .parse::<f64>()
                    .map_err(|e| SolverError::Format(e.to_string()))?;
                vars_value.insert(result_line[1].to_string(), value);
            } else {
                return Err(format_error("Column specification has too few fields"));
            }
        }
        Ok(Solution::new(status, vars_value))
    }
}

impl SolverProgram for GlpkSolver {
    fn command_name(&self) -> &str {
        &self.command_name
    }

    fn arguments(&self, lp_file: &Path, solution_file: &Path) -> Vec<OsString> {
        vec![
            "--lp".into(),
            lp_file.into(),
            "-o".into(),
            solution_file.into(),
        ]
    }

    fn preferred_temp_solution_file(&self) -> Option<&Path> {
        self.temp_solution_file.as_deref()
    }
}
