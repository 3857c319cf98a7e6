//! The IBM CPLEX optimizer, behind the `cplex` feature.
//!
//! CPLEX is driven through its interactive command line, and writes its
//! solution as XML.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};

use xml::attribute::OwnedAttribute;
use xml::reader::XmlEvent;
use xml::EventReader;

use crate::lp_format::LpProblem;
use crate::solvers::{Solution, SolverError, SolverProgram, SolverWithSolutionParsing, Status};
use crate::util::buf_contains;

/// IBM cplex optimizer
#[derive(Debug, Clone)]
pub struct Cplex {
    command: String,
    temp_solution_file: Option<PathBuf>,
}

impl Default for Cplex {
    fn default() -> Self {
        Cplex::with_command("cplex".to_string())
    }
}

impl Cplex {
    /// Use the given cplex executable
    pub fn with_command(command: String) -> Self {
        Cplex {
            command,
            temp_solution_file: None,
        }
    }

    /// write the solution to this file instead of a temporary one
    pub fn with_temp_solution_file(&self, temp_solution_file: String) -> Self {
        Cplex {
            temp_solution_file: Some(temp_solution_file.into()),
            ..self.clone()
        }
    }
}

/// A cplex interactive command taking a quoted path
fn path_command(command: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(command);
    arg.push(" \"");
    arg.push(path);
    arg.push("\"");
    arg
}

impl SolverProgram for Cplex {
    fn command_name(&self) -> &str {
        &self.command
    }

    fn arguments(&self, lp_file: &Path, solution_file: &Path) -> Vec<OsString> {
        vec![
            "-c".into(),
            path_command("READ", lp_file),
            "optimize".into(),
            path_command("WRITE", solution_file),
        ]
    }

    fn preferred_temp_solution_file(&self) -> Option<&Path> {
        self.temp_solution_file.as_deref()
    }

    fn parse_stdout_status(&self, stdout: &[u8]) -> Option<Status> {
        if buf_contains(stdout, "No solution exists") {
            Some(Status::Infeasible)
        } else {
            None
        }
    }

    fn solution_suffix(&self) -> Option<&str> {
        Some(".sol")
    }
}

/// Status from the `solutionStatusString` of the solution header
fn header_status(attributes: &[OwnedAttribute]) -> Option<Status> {
    let status = attributes
        .iter()
        .find(|a| a.name.local_name == "solutionStatusString")?
        .value
        .to_ascii_lowercase();
    Some(if status.contains("infeasible") {
        Status::Infeasible
    } else if status.contains("unbounded") {
        Status::Unbounded
    } else if status.contains("optimal") {
        Status::Optimal
    } else {
        Status::SubOptimal
    })
}

/// Name and value of a `<variable name=".." value=".."/>` element
fn variable_value(attributes: Vec<OwnedAttribute>) -> Result<Option<(String, f64)>, SolverError> {
    let mut name = None;
    let mut value = None;
    for attribute in attributes {
        match attribute.name.local_name.as_str() {
            "name" => name = Some(attribute.value),
            "value" => value = Some(attribute.value),
            _ => {}
        }
    }
    match (name, value) {
        (Some(name), Some(value)) => {
            let parsed = value.parse::<f64>().map_err(|e| {
                SolverError::Format(format!("invalid value {:?} for {}: {}", value, name, e))
            })?;
            Ok(Some((name, parsed)))
        }
        _ => Ok(None),
    }
}

impl SolverWithSolutionParsing for Cplex {
    fn read_specific_solution<'a, P: LpProblem<'a>>(
        &self,
        f: &File,
        problem: Option<&'a P>,
    ) -> Result<Solution, SolverError> {
        let capacity = problem.map_or(0, |p| p.variables().size_hint().0);
        let mut results = HashMap::with_capacity(capacity);
        let mut status = Status::Optimal;
        for event in EventReader::new(f) {
            let event = event.map_err(|e| SolverError::Format(format!("xml error: {}", e)))?;
            if let XmlEvent::StartElement {
                name, attributes, ..
            } = event
            {
                match name.local_name.as_str() {
                    "header" => status = header_status(&attributes).unwrap_or(status),
                    "variable" => {
                        if let Some((name, value)) = variable_value(attributes)? {
                            results.insert(name, value);
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(Solution::new(status, results))
    }
}
