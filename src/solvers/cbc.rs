//! The COIN-OR Cbc solver
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::lp_format::*;
use crate::solvers::{
    Solution, SolverError, SolverProgram, SolverWithSolutionParsing, Status, WithMaxSeconds,
    WithNbThreads,
};

/// The open source Cbc solver, run through its `cbc` executable
#[derive(Debug, Clone)]
pub struct CbcSolver {
    command_name: String,
    temp_solution_file: Option<PathBuf>,
    threads: Option<u32>,
    seconds: Option<u32>,
}

impl Default for CbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CbcSolver {
    /// create a solver instance
    pub fn new() -> CbcSolver {
        CbcSolver {
            command_name: "cbc".to_string(),
            temp_solution_file: None,
            threads: None,
            seconds: None,
        }
    }

    /// set the name of the commandline cbc executable to use
    pub fn command_name(&self, command_name: String) -> CbcSolver {
        CbcSolver {
            command_name,
            ..self.clone()
        }
    }

    /// write the solution to this file instead of a temporary one
    pub fn with_temp_solution_file(&self, temp_solution_file: String) -> CbcSolver {
        CbcSolver {
            temp_solution_file: Some(temp_solution_file.into()),
            ..self.clone()
        }
    }
}

impl SolverWithSolutionParsing for CbcSolver {
    fn read_specific_solution<'a, P: LpProblem<'a>>(
        &self,
        f: &File,
        problem: Option<&'a P>,
    ) -> Result<Solution, SolverError> {
        let mut vars_value: HashMap<String, _> = HashMap::new();

        // populate default values for all vars
        // CBC keeps only non-zero values from a number of variables
        if let Some(p) = problem {
            for var in p.variables() {
                vars_value.insert(var.name().to_string(), 0.0);
            }
        }

        let mut file = BufReader::new(f);
        let mut buffer = String::new();
        file.read_line(&mut buffer)?;

        let status = match buffer.split_whitespace().next() {
            Some("Optimal") => Status::Optimal,
            // Infeasible status is either "Infeasible" or "Integer infeasible"
            Some("Infeasible") | Some("Integer") => Status::Infeasible,
            Some("Unbounded") => Status::Unbounded,
            // "Stopped" can be "on time", "on iterations", "on difficulties" or "on ctrl-c"
            Some("Stopped") => Status::SubOptimal,
            Some(_) => Status::NotSolved,
            None => return Err(SolverError::Format("empty cbc solution file".to_string())),
        };
        for line in file.lines() {
            let l = line?;
            let mut result_line: Vec<_> = l.split_whitespace().collect();
            if result_line.first() == Some(&"**") {
                result_line.remove(0);
            };
            match result_line.len() {
                0 => continue,
                4 => {
                    let value = result_line[2]
                        .parse::<f64>()
                        .map_err(|e| SolverError::Format(e.to_string()))?;
                    vars_value.insert(result_line[1].to_string(), value);
                }
                _ => return Err(SolverError::Format(l.clone())),
            }
        }
        Ok(Solution::new(status, vars_value))
    }
}

impl WithMaxSeconds<CbcSolver> for CbcSolver {
    fn max_seconds(&self) -> Option<u32> {
        self.seconds
    }
    fn with_max_seconds(&self, seconds: u32) -> CbcSolver {
        CbcSolver {
            seconds: Some(seconds),
            ..(*self).clone()
        }
    }
}

impl WithNbThreads<CbcSolver> for CbcSolver {
    fn nb_threads(&self) -> Option<u32> {
        self.threads
    }
    fn with_nb_threads(&self, threads: u32) -> CbcSolver {
        CbcSolver {
            threads: Some(threads),
            ..(*self).clone()
        }
    }
}

impl SolverProgram for CbcSolver {
    fn command_name(&self) -> &str {
        &self.command_name
    }

    fn arguments(&self, lp_file: &Path, solution_file: &Path) -> Vec<OsString> {
        let mut args = vec![lp_file.as_os_str().to_owned()];
        for (name, value) in [
            ("seconds", self.max_seconds()),
            ("threads", self.nb_threads()),
        ]
        .iter()
        {
            if let Some(val) = value {
                args.push(name.into());
                args.push(val.to_string().into());
            }
        }
        args.extend_from_slice(&[
            "solve".into(),
            "solution".into(),
            solution_file.into(),
        ]);
        args
    }

    fn preferred_temp_solution_file(&self) -> Option<&Path> {
        self.temp_solution_file.as_deref()
    }
}
