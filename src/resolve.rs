//! Resolution of arguments that may name a column or hold a constant
use tracing::trace;

use crate::error::{FrameError, Result};
use crate::table::{Scalar, Table, Value};

/// A per-row argument: either the values of a column or a constant.
///
/// Numbers convert to [Ref::Literal]. Strings convert to [Ref::Auto], which
/// reads the column of that name if there is one. Use [Ref::Column] or
/// [Ref::Literal] to make the choice explicit.
#[derive(Clone, Debug, PartialEq)]
pub enum Ref {
    /// the values of the named column; fails if there is no such column
    Column(String),
    /// the same value on every row
    Literal(Scalar),
    /// a column if the value is a string naming one, a literal otherwise
    Auto(Scalar),
}

impl Ref {
    /// Reference to a column
    pub fn column<S: Into<String>>(name: S) -> Self {
        Ref::Column(name.into())
    }

    /// A constant
    pub fn literal<S: Into<Scalar>>(value: S) -> Self {
        Ref::Literal(value.into())
    }
}

impl From<f64> for Ref {
    fn from(v: f64) -> Self {
        Ref::Literal(Scalar::Float(v))
    }
}

impl From<i64> for Ref {
    fn from(v: i64) -> Self {
        Ref::Literal(Scalar::Int(v))
    }
}

impl From<i32> for Ref {
    fn from(v: i32) -> Self {
        Ref::Literal(Scalar::Int(v as i64))
    }
}

impl From<&str> for Ref {
    fn from(v: &str) -> Self {
        Ref::Auto(Scalar::from(v))
    }
}

impl From<String> for Ref {
    fn from(v: String) -> Self {
        Ref::Auto(Scalar::Str(v))
    }
}

/// A resolved [Ref], readable row by row
#[derive(Debug)]
pub(crate) enum Resolved<'t, V, C> {
    Column(&'t [Value<V, C>]),
    Constant(Value<V, C>),
}

impl<'t, V, C> Resolved<'t, V, C> {
    pub(crate) fn get(&self, row: usize) -> &Value<V, C> {
        match self {
            Resolved::Column(values) => &values[row],
            Resolved::Constant(value) => value,
        }
    }
}

pub(crate) fn resolve<'t, V, C>(
    table: &'t Table<V, C>,
    reference: &Ref,
) -> Result<Resolved<'t, V, C>> {
    match reference {
        Ref::Column(name) => Ok(Resolved::Column(table.values(name)?)),
        Ref::Literal(value) => Ok(Resolved::Constant(Value::Scalar(value.clone()))),
        Ref::Auto(value) => match value.as_str().and_then(|name| table.get(name)) {
            Some(values) => {
                trace!(column = %value, "argument resolved to a column");
                Ok(Resolved::Column(values))
            }
            None => Ok(Resolved::Constant(Value::Scalar(value.clone()))),
        },
    }
}

/// One bound per row
pub(crate) fn resolve_bounds<V, C>(table: &Table<V, C>, reference: &Ref) -> Result<Vec<f64>> {
    let resolved = resolve(table, reference)?;
    (0..table.len())
        .map(|row| match resolved.get(row) {
            Value::Scalar(s) => s
                .as_f64()
                .ok_or_else(|| FrameError::NotNumeric(format!("{:?}", s))),
            _ => Err(FrameError::NotNumeric(format!("{:?} at row {}", reference, row))),
        })
        .collect()
}
