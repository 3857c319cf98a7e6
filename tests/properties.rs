use proptest::prelude::*;

use lp_frames::frame::VarOptions;
use lp_frames::lp_format::LpProblem;
use lp_frames::lp_model::{LpModel, LpTable};
use lp_frames::model::{attr, Sense};
use lp_frames::table::{Index, Scalar};

fn caps() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..1000.0, 0..20)
}

proptest! {
    #[test]
    fn variables_follow_the_rows(caps in caps()) {
        let mut model = LpModel::new("m");
        let table = LpTable::range(caps.len())
            .with_column("cap", caps.clone())
            .unwrap();
        let with_x = table
            .add_vars(&mut model, "x", VarOptions::default().with_ub("cap"))
            .unwrap();

        prop_assert_eq!(with_x.len(), table.len());
        prop_assert_eq!(with_x.index(), table.index());
        prop_assert_eq!(model.num_vars(), caps.len());
        let ub: Vec<f64> = with_x
            .column("x")
            .unwrap()
            .get_attr(&model, attr::UB)
            .unwrap()
            .iter()
            .map(|v| v.as_scalar().and_then(Scalar::as_f64).unwrap())
            .collect();
        prop_assert_eq!(ub, caps);
    }

    #[test]
    fn one_constraint_per_row(labels in prop::collection::btree_set(-50i64..50, 0..15)) {
        let mut model = LpModel::new("m");
        let index: Index = labels.iter().copied().collect();
        let table = LpTable::new(index)
            .add_vars(&mut model, "x", VarOptions::default())
            .unwrap()
            .add_lconstrs(&mut model, "x".into(), Sense::Less, 1.0.into(), "c")
            .unwrap();

        prop_assert_eq!(model.num_constrs(), labels.len());
        let names: Vec<String> = table
            .column("c")
            .unwrap()
            .get_attr(&model, attr::CONSTR_NAME)
            .unwrap()
            .iter()
            .map(|v| v.as_scalar().and_then(Scalar::as_str).unwrap().to_string())
            .collect();
        let expected: Vec<String> = labels.iter().map(|l| format!("c[{}]", l)).collect();
        prop_assert_eq!(names, expected);
    }

    #[test]
    fn expression_and_explicit_forms_agree(
        b in prop::collection::vec(-100.0f64..100.0, 0..10),
        sense in prop::sample::select(vec![
            ("<=", Sense::Less),
            (">=", Sense::Greater),
            ("=", Sense::Equal),
        ]),
    ) {
        let build = |expression: bool| {
            let mut model = LpModel::new("m");
            let table = LpTable::range(b.len())
                .with_column("b", b.clone())
                .unwrap()
                .add_vars(&mut model, "a", VarOptions::default())
                .unwrap();
            let before = table.clone();
            let result = if expression {
                table.add_constrs(&mut model, &format!("a {} b", sense.0), "c")
            } else {
                table.add_lconstrs(&mut model, "a".into(), sense.1, "b".into(), "c")
            }
            .unwrap();
            assert_eq!(table, before);
            (result, model.to_problem().display_lp().to_string())
        };
        let (from_expression, lp_expression) = build(true);
        let (from_explicit, lp_explicit) = build(false);
        prop_assert_eq!(
            from_expression.column_names().collect::<Vec<_>>(),
            from_explicit.column_names().collect::<Vec<_>>()
        );
        prop_assert_eq!(lp_expression, lp_explicit);
    }
}
