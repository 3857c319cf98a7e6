use std::cmp::Ordering;

use lp_frames::frame::VarOptions;
use lp_frames::linear::LinExpr;
use lp_frames::lp_format::{Constraint, LpObjective, LpProblem};
use lp_frames::lp_model::{LpModel, LpTable};
use lp_frames::model::{Sense, VarType};
use lp_frames::problem::{LinearExpression, Problem, Variable};
use lp_frames::resolve::Ref;
use lp_frames::table::Index;

fn expr(terms: &[(f64, &str)]) -> LinearExpression {
    LinearExpression {
        terms: terms.iter().map(|(c, n)| (*c, n.to_string())).collect(),
    }
}

#[test]
fn simple_problem() {
    let pb = Problem {
        name: "my_problem".to_string(),
        sense: LpObjective::Minimize,
        objective: expr(&[(2., "x"), (1., "y")]),
        variables: vec![
            Variable {
                name: "x".to_string(),
                var_type: VarType::Continuous,
                lower_bound: f64::NEG_INFINITY,
                upper_bound: f64::INFINITY,
            },
            Variable {
                name: "y".to_string(),
                var_type: VarType::Continuous,
                lower_bound: 0.0,
                upper_bound: f64::INFINITY,
            },
            Variable {
                name: "z".to_string(),
                var_type: VarType::Continuous,
                lower_bound: 1.,
                upper_bound: 10.,
            },
        ],
        constraints: vec![Constraint {
            name: String::new(),
            lhs: expr(&[(1., "x"), (1., "y"), (1., "z")]),
            operator: Ordering::Greater,
            rhs: 5.0,
        }],
    };
    let expected_str = "\\ my_problem

Minimize
  obj: 2 x + y

Subject To
  c0: x + y + z >= 5

Bounds
  x free
  0 <= y
  1 <= z <= 10

End
";
    assert_eq!(pb.display_lp().to_string(), expected_str);
}

#[test]
fn with_integers() {
    let pb = Problem {
        name: "int_problem".to_string(),
        sense: LpObjective::Maximize,
        objective: expr(&[(1., "x"), (-1., "y")]),
        variables: vec![
            Variable {
                name: "x".to_string(),
                var_type: VarType::Integer,
                lower_bound: -10.,
                upper_bound: 10.,
            },
            Variable {
                name: "y".to_string(),
                var_type: VarType::Integer,
                lower_bound: f64::NEG_INFINITY,
                upper_bound: 16.5,
            },
        ],
        constraints: vec![Constraint {
            name: "gap".to_string(),
            lhs: expr(&[(1., "x"), (-1., "y")]),
            operator: Ordering::Less,
            rhs: -5.0,
        }],
    };
    let expected_str = "\\ int_problem

Maximize
  obj: x - y

Subject To
  gap: x - y <= -5

Bounds
  -10 <= x <= 10
  -inf <= y <= 16.5

Generals
  x
  y

End
";
    assert_eq!(pb.display_lp().to_string(), expected_str);
}

#[test]
fn model_built_from_a_table() {
    let mut model = LpModel::new("plan");
    let table = LpTable::range(2)
        .with_column("cap", vec![4.0, 2.5])
        .unwrap()
        .add_vars(&mut model, "x", VarOptions::default().with_ub("cap"))
        .unwrap()
        .add_vars(
            &mut model,
            "y",
            VarOptions::default()
                .with_lb(-1.0)
                .with_vtype(VarType::Integer),
        )
        .unwrap()
        .add_constrs(&mut model, "2 * x - y <= cap", "c")
        .unwrap();

    let mut objective = LinExpr::new();
    for column in &["x", "y"] {
        for value in table.values(column).unwrap() {
            objective = objective + value.to_lin_expr().unwrap();
        }
    }
    model.set_objective(objective, LpObjective::Maximize);

    let expected_str = "\\ plan

Maximize
  obj: x_0_ + x_1_ + y_0_ + y_1_

Subject To
  c_0_: 2 x_0_ - y_0_ <= 4
  c_1_: 2 x_1_ - y_1_ <= 2.5

Bounds
  0 <= x_0_ <= 4
  0 <= x_1_ <= 2.5
  -1 <= y_0_
  -1 <= y_1_

Generals
  y_0_
  y_1_

End
";
    assert_eq!(model.to_problem().display_lp().to_string(), expected_str);
}

#[test]
fn binaries_over_an_index() {
    let mut model = LpModel::new("assign");
    let index: Index = vec!["a", "b"].into_iter().collect();
    let pick = index
        .add_vars(&mut model, Some("pick"), 0.0, 1.0, VarType::Binary)
        .unwrap();
    LpTable::new(index)
        .join(pick)
        .unwrap()
        .with_column("w", vec![3.0, 5.0])
        .unwrap()
        .add_lconstrs(
            &mut model,
            Ref::column("pick"),
            Sense::Less,
            Ref::column("w"),
            "cap",
        )
        .unwrap();

    let expected_str = "\\ assign

Minimize
  obj: 0 pick_a_

Subject To
  cap_a_: pick_a_ <= 3
  cap_b_: pick_b_ <= 5

Bounds
  0 <= pick_a_ <= 1
  0 <= pick_b_ <= 1

Binaries
  pick_a_
  pick_b_

End
";
    assert_eq!(model.to_problem().display_lp().to_string(), expected_str);
}
