//! Attribute queries over columns of model handles
use std::fmt::Debug;

use crate::error::{FrameError, Result};
use crate::model::{attr, Model};
use crate::table::{Scalar, Series, Value};

impl<V, C> Series<V, C>
where
    V: Clone + Debug,
    C: Clone + Debug,
{
    /// Query `attr` on every handle of the series, e.g. [attr::X] for
    /// solution values or [attr::SLACK] for constraint slacks. The result
    /// keeps the name and index of the series.
    ///
    /// Attribute names are not checked here: the model reports unknown ones.
    pub fn get_attr<M>(&self, model: &M, attr: &str) -> Result<Series<V, C>>
    where
        M: Model<Var = V, Constr = C>,
    {
        let values = self
            .iter()
            .map(|value| {
                let result = match value {
                    Value::Var(v) => model.var_attr(v, attr),
                    Value::Constr(c) => model.constr_attr(c, attr),
                    other => return Err(FrameError::NotAHandle(format!("{:?}", other))),
                };
                result.map(Value::Scalar).map_err(FrameError::model)
            })
            .collect::<Result<Vec<_>>>()?;
        Series::new(self.name().map(str::to_string), self.index().clone(), values)
    }

    /// Value of every expression of the series in the model's current
    /// solution. Variables count as single-term expressions and numbers as
    /// constants. The result is unnamed.
    pub fn get_value<M>(&self, model: &M) -> Result<Series<V, C>>
    where
        M: Model<Var = V, Constr = C>,
    {
        let solution_value = |var: &V| -> Result<f64> {
            let x = model.var_attr(var, attr::X).map_err(FrameError::model)?;
            x.as_f64().ok_or_else(|| FrameError::NotNumeric(x.to_string()))
        };
        let values = self
            .iter()
            .map(|value| {
                value
                    .to_lin_expr()?
                    .value(&solution_value)
                    .map(|v| Value::Scalar(Scalar::Float(v)))
            })
            .collect::<Result<Vec<_>>>()?;
        Series::new(None, self.index().clone(), values)
    }
}
