//! Model building directly from tables.
//!
//! Each operation requests model components row by row and returns a copy
//! of the table with the new handles joined as a column aligned to the
//! table's index. The source table is never modified.
//!
//! ```
//! use lp_frames::frame::VarOptions;
//! use lp_frames::lp_model::{LpModel, LpTable};
//! use lp_frames::model::{attr, Sense};
//! use lp_frames::table::Value;
//! use lp_frames::resolve::Ref;
//!
//! let mut model = LpModel::new("capacity");
//! let table = LpTable::range(3)
//!     .with_column("cap", vec![1.0, 2.0, 3.0]).unwrap();
//!
//! let table = table
//!     .add_vars(&mut model, "x", VarOptions::default().with_ub("cap"))
//!     .unwrap();
//! let table = table
//!     .add_lconstrs(&mut model, Ref::column("x"), Sense::Greater, 0.5.into(), "min_x")
//!     .unwrap();
//! let ub = table.column("x").unwrap().get_attr(&model, attr::UB).unwrap();
//! assert_eq!(ub.values()[2], Value::from(3.0));
//! ```
use std::fmt::Debug;

use tracing::debug;

use crate::error::{FrameError, Result};
use crate::model::{Model, Sense, VarType};
use crate::parse::{parse_comparison, Expr};
use crate::resolve::{resolve, resolve_bounds, Ref};
use crate::table::{Index, IndexKey, Scalar, Series, Table, Value};

/// Which keys identify the variables created by [Table::add_vars]
#[derive(Clone, Debug, PartialEq)]
pub enum IndexSelector {
    /// the labels of the table's index
    Rows,
    /// the values of one column
    Column(String),
    /// the values of several columns, one tuple per row
    Columns(Vec<String>),
}

impl Default for IndexSelector {
    fn default() -> Self {
        IndexSelector::Rows
    }
}

/// Options of [Table::add_vars]: non-negative continuous variables keyed by
/// row label unless told otherwise.
///
/// The bounds may name a column. The variable type is always a constant.
#[derive(Clone, Debug, PartialEq)]
pub struct VarOptions {
    index: IndexSelector,
    lb: Ref,
    ub: Ref,
    vtype: VarType,
}

impl Default for VarOptions {
    fn default() -> Self {
        VarOptions {
            index: IndexSelector::Rows,
            lb: Ref::from(0.0),
            ub: Ref::from(f64::INFINITY),
            vtype: VarType::Continuous,
        }
    }
}

impl VarOptions {
    /// Choose the keys the variables are created with
    pub fn with_index(self, index: IndexSelector) -> Self {
        VarOptions { index, ..self }
    }

    /// Lower bound: a number, or a column holding one bound per row
    pub fn with_lb<R: Into<Ref>>(self, lb: R) -> Self {
        VarOptions {
            lb: lb.into(),
            ..self
        }
    }

    /// Upper bound: a number, or a column holding one bound per row
    pub fn with_ub<R: Into<Ref>>(self, ub: R) -> Self {
        VarOptions {
            ub: ub.into(),
            ..self
        }
    }

    /// Variable type, shared by all the variables
    pub fn with_vtype(self, vtype: VarType) -> Self {
        VarOptions { vtype, ..self }
    }
}

fn index_keys<V: Debug, C: Debug>(
    table: &Table<V, C>,
    selector: &IndexSelector,
) -> Result<Vec<IndexKey>> {
    let scalar = |value: &Value<V, C>| {
        value
            .as_scalar()
            .cloned()
            .ok_or_else(|| FrameError::NotNumeric(format!("{:?}", value)))
    };
    match selector {
        IndexSelector::Rows => Ok(table
            .index()
            .iter()
            .cloned()
            .map(IndexKey::Label)
            .collect()),
        IndexSelector::Column(name) => table
            .values(name)?
            .iter()
            .map(|v| scalar(v).map(IndexKey::Label))
            .collect(),
        IndexSelector::Columns(names) => {
            let columns = names
                .iter()
                .map(|name| table.values(name))
                .collect::<Result<Vec<_>>>()?;
            (0..table.len())
                .map(|row| {
                    columns
                        .iter()
                        .map(|values| scalar(&values[row]))
                        .collect::<Result<Vec<Scalar>>>()
                        .map(IndexKey::Tuple)
                })
                .collect()
        }
    }
}

impl<V, C> Table<V, C>
where
    V: Clone + Debug,
    C: Clone + Debug,
{
    /// Add one variable per row to the model and join the handles as the
    /// column `name`. Variables are named `name[key]`.
    pub fn add_vars<M>(
        &self,
        model: &mut M,
        name: &str,
        options: VarOptions,
    ) -> Result<Table<V, C>>
    where
        M: Model<Var = V, Constr = C>,
    {
        let keys = index_keys(self, &options.index)?;
        let lb = resolve_bounds(self, &options.lb)?;
        let ub = resolve_bounds(self, &options.ub)?;
        debug!(name, count = keys.len(), "adding variables");
        let vars = model
            .add_vars(&keys, Some(name), &lb, &ub, options.vtype)
            .map_err(FrameError::model)?;
        let values = vars.into_iter().map(Value::Var).collect();
        let column = Series::new(Some(name.to_string()), self.index().clone(), values)?;
        self.join(column)
    }

    /// Add one constraint `lhs sense rhs` per row and join the handles as the
    /// column `name`. Constraints are named `name[label]`.
    ///
    /// Each side resolves to a column of numbers, variables or expressions, or
    /// to a constant.
    pub fn add_lconstrs<M>(
        &self,
        model: &mut M,
        lhs: Ref,
        sense: Sense,
        rhs: Ref,
        name: &str,
    ) -> Result<Table<V, C>>
    where
        M: Model<Var = V, Constr = C>,
    {
        let lhs = resolve(self, &lhs)?;
        let rhs = resolve(self, &rhs)?;
        debug!(name, count = self.len(), %sense, "adding constraints");
        let constrs = self
            .index()
            .iter()
            .enumerate()
            .map(|(row, label)| {
                model
                    .add_lconstr(
                        lhs.get(row).to_lin_expr()?,
                        sense,
                        rhs.get(row).to_lin_expr()?,
                        &format!("{}[{}]", name, label),
                    )
                    .map(Value::Constr)
                    .map_err(FrameError::model)
            })
            .collect::<Result<Vec<_>>>()?;
        let column = Series::new(Some(name.to_string()), self.index().clone(), constrs)?;
        self.join(column)
    }

    /// Add one constraint per row from a comparison such as `"x + y <= cap"`,
    /// where names refer to columns. See [crate::parse] for the grammar.
    pub fn add_constrs<M>(&self, model: &mut M, expr: &str, name: &str) -> Result<Table<V, C>>
    where
        M: Model<Var = V, Constr = C>,
    {
        let comparison = parse_comparison(expr)?;
        let columns = comparison.lhs.columns().into_iter();
        for column in columns.chain(comparison.rhs.columns()) {
            self.values(column)?;
        }
        let evaluate = |side: &Expr| {
            (0..self.len())
                .map(|row| side.evaluate(self, row).map(Value::Expr))
                .collect::<Result<Vec<Value<V, C>>>>()
        };
        let sides = Table::new(self.index().clone())
            .with_column("lhs", evaluate(&comparison.lhs)?)?
            .with_column("rhs", evaluate(&comparison.rhs)?)?;
        let constrained = sides
            .add_lconstrs(
                model,
                Ref::column("lhs"),
                comparison.sense,
                Ref::column("rhs"),
                name,
            )?
            .drop(&["lhs", "rhs"])?;
        self.join(constrained.column(name)?)
    }
}

impl Index {
    /// Add one variable per label, with constant bounds. Variables are named
    /// `name[label]`, or get the model's default names when `name` is `None`.
    pub fn add_vars<M>(
        &self,
        model: &mut M,
        name: Option<&str>,
        lb: f64,
        ub: f64,
        vtype: VarType,
    ) -> Result<Series<M::Var, M::Constr>>
    where
        M: Model,
    {
        let keys: Vec<IndexKey> = self.iter().cloned().map(IndexKey::Label).collect();
        debug!(?name, count = keys.len(), "adding variables over an index");
        let (lbs, ubs) = (vec![lb; keys.len()], vec![ub; keys.len()]);
        let vars = model
            .add_vars(&keys, name, &lbs, &ubs, vtype)
            .map_err(FrameError::model)?;
        Series::new(
            name.map(str::to_string),
            self.clone(),
            vars.into_iter().map(Value::Var).collect(),
        )
    }
}
