use std::fs;
use std::path::Path;

use lp_frames::lp_format::LpObjective;
use lp_frames::model::VarType;
use lp_frames::problem::{LinearExpression, Problem, Variable};
use lp_frames::solvers::{
    CbcSolver, GlpkSolver, GurobiSolver, Solution, SolverError, SolverProgram,
    SolverWithSolutionParsing, Status, WithMaxSeconds, WithNbThreads,
};

fn problem(names: &[&str]) -> Problem {
    Problem {
        name: "parsing".to_string(),
        sense: LpObjective::Minimize,
        objective: LinearExpression::default(),
        variables: names
            .iter()
            .map(|name| Variable {
                name: name.to_string(),
                var_type: VarType::Continuous,
                lower_bound: 0.0,
                upper_bound: f64::INFINITY,
            })
            .collect(),
        constraints: vec![],
    }
}

/// Solution files are removed once read, so each test reads a copy
fn read<S: SolverWithSolutionParsing>(
    solver: &S,
    file: &str,
    problem: Option<&Problem>,
) -> Result<Solution, SolverError> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(file);
    fs::copy(Path::new("tests/solution_files").join(file), &path).unwrap();
    let solution = solver.read_solution(&path, problem);
    assert!(solution.is_err() || !path.exists());
    solution
}

#[test]
fn cbc_optimal() {
    let Solution {
        status,
        results: mut variables,
    } = read(&CbcSolver::new(), "cbc_optimal.sol", None).unwrap();
    assert_eq!(status, Status::Optimal);
    assert_eq!(variables.remove("a"), Some(5.));
    assert_eq!(variables.remove("b"), Some(6.));
    assert_eq!(variables.remove("c"), Some(0.));
    assert!(variables.is_empty());
}

#[test]
fn cbc_infeasible() {
    let Solution { status, .. } = read(&CbcSolver::new(), "cbc_infeasible.sol", None).unwrap();
    assert_eq!(status, Status::Infeasible);
}

#[test]
// created from:
// minimize
//   obj: a + b
// subject to
//   c1: a + b <= 1
//   c2: a + b >= 2
// binaries
//   a b
// end
fn cbc_infeasible_alternative_format() {
    let Solution {
        status,
        results: mut variables,
    } = read(
        &CbcSolver::new(),
        "cbc_infeasible_alternative_format.sol",
        None,
    )
    .unwrap();
    assert_eq!(status, Status::Infeasible);
    assert_eq!(variables.remove("a"), Some(2.));
    assert_eq!(variables.remove("b"), Some(0.));
}

#[test]
fn cbc_unbounded() {
    let Solution { status, .. } = read(&CbcSolver::new(), "cbc_unbounded.sol", None).unwrap();
    assert_eq!(status, Status::Unbounded);
}

#[test]
fn cbc_missing_variables_are_zero() {
    let pb = problem(&["x_0_", "x_1_"]);
    let solution = read(&CbcSolver::new(), "cbc_sparse.sol", Some(&pb)).unwrap();
    assert_eq!(solution.status, Status::Optimal);
    assert_eq!(solution.results.get("x_0_"), Some(&0.));
    assert_eq!(solution.results.get("x_1_"), Some(&3.));
}

#[test]
fn cbc_arguments() {
    let solver = CbcSolver::new().with_max_seconds(10).with_nb_threads(2);
    let args = solver.arguments(Path::new("pb.lp"), Path::new("pb.sol"));
    let args: Vec<_> = args.iter().map(|a| a.to_string_lossy()).collect();
    assert_eq!(
        args,
        vec!["pb.lp", "seconds", "10", "threads", "2", "solve", "solution", "pb.sol"]
    );
}

#[test]
fn glpk_optimal() {
    let Solution {
        status,
        results: mut variables,
    } = read(&GlpkSolver::new(), "glpk_optimal.sol", None).unwrap();
    assert_eq!(status, Status::Optimal);
    assert_eq!(variables.remove("a"), Some(0.));
    assert_eq!(variables.remove("b"), Some(5.));
    assert_eq!(variables.remove("c"), Some(0.));
}

#[test]
fn glpk_integer_optimal() {
    let solution = read(&GlpkSolver::new(), "glpk_integer.sol", None).unwrap();
    assert_eq!(solution.status, Status::Optimal);
    assert_eq!(solution.results.get("a"), Some(&1.));
    assert_eq!(solution.results.get("b"), Some(&2.));
}

#[test]
fn glpk_infeasible() {
    let Solution { status, .. } = read(&GlpkSolver::new(), "glpk_infeasible.sol", None).unwrap();
    assert_eq!(status, Status::Infeasible);
}

#[test]
fn gurobi_skips_comments() {
    let solution = read(&GurobiSolver::new(), "gurobi.sol", None).unwrap();
    assert_eq!(solution.status, Status::Optimal);
    assert_eq!(solution.results.len(), 3);
    assert_eq!(solution.results.get("a"), Some(&5.));
    assert_eq!(solution.results.get("b"), Some(&6.));
    assert_eq!(solution.results.get("c"), Some(&0.));
}

#[test]
fn gurobi_malformed_line() {
    let err = read(&GurobiSolver::new(), "gurobi_malformed.sol", None).unwrap_err();
    assert!(matches!(err, SolverError::Format(_)));
}

#[test]
fn gurobi_stdout_status() {
    let solver = GurobiSolver::new();
    assert_eq!(
        solver.parse_stdout_status(b"Model is infeasible\nBest objective -"),
        Some(Status::Infeasible)
    );
    assert_eq!(
        solver.parse_stdout_status(b"Optimal solution found (tolerance 1.00e-04)"),
        Some(Status::Optimal)
    );
    assert_eq!(
        solver.parse_stdout_status(b"Model is unbounded\nBest objective -"),
        Some(Status::Unbounded)
    );
    assert_eq!(
        solver.parse_stdout_status(b"Infeasible or unbounded model"),
        Some(Status::NotSolved)
    );
    assert_eq!(solver.parse_stdout_status(b"Explored 0 nodes"), None);
}

#[test]
fn missing_solution_file() {
    let err = CbcSolver::new()
        .read_solution::<Problem>(Path::new("tests/solution_files/missing.sol"), None)
        .unwrap_err();
    assert!(matches!(err, SolverError::SolutionFile { .. }));
}

#[cfg(feature = "cplex")]
#[test]
fn cplex_xml_solution() {
    use lp_frames::solvers::cplex::Cplex;
    let solution = read(&Cplex::default(), "cplex.sol", None).unwrap();
    assert_eq!(solution.status, Status::Optimal);
    assert_eq!(solution.results.get("a"), Some(&5.));
    assert_eq!(solution.results.get("b"), Some(&6.));
    assert_eq!(solution.results.get("c"), Some(&0.));
}
