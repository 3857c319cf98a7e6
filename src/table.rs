//! A small index-aligned table, just enough to carry data and model handles
//! row by row.
use std::fmt;

use crate::error::{FrameError, Result};
use crate::linear::LinExpr;

/// A plain data value
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// integer
    Int(i64),
    /// floating point number
    Float(f64),
    /// boolean
    Bool(bool),
    /// text
    Str(String),
}

impl Scalar {
    /// The value as a number, if it is one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Bool(_) | Scalar::Str(_) => None,
        }
    }

    /// The value as text, if it is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

macro_rules! scalar_from {
    ($($t:ty => $variant:ident $(as $cast:ty)?),* $(,)?) => {
        $(
            impl From<$t> for Scalar {
                fn from(v: $t) -> Self {
                    Scalar::$variant(v $(as $cast)?)
                }
            }

            impl<V, C> From<$t> for Value<V, C> {
                fn from(v: $t) -> Self {
                    Value::Scalar(Scalar::from(v))
                }
            }
        )*
    };
}

scalar_from! {
    i64 => Int,
    i32 => Int as i64,
    u32 => Int as i64,
    usize => Int as i64,
    f64 => Float,
    f32 => Float as f64,
    bool => Bool,
    String => Str,
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl<V, C> From<&str> for Value<V, C> {
    fn from(v: &str) -> Self {
        Value::Scalar(Scalar::from(v))
    }
}

impl<V, C> From<Scalar> for Value<V, C> {
    fn from(v: Scalar) -> Self {
        Value::Scalar(v)
    }
}

/// Key identifying one variable in a batched variable creation
#[derive(Clone, Debug, PartialEq)]
pub enum IndexKey {
    /// a single row label or column value
    Label(Scalar),
    /// the values of several columns in one row
    Tuple(Vec<Scalar>),
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKey::Label(s) => write!(f, "{}", s),
            IndexKey::Tuple(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", part)?;
                }
                Ok(())
            }
        }
    }
}

/// One cell of a table: data, or a handle returned by a model
#[derive(Clone, Debug, PartialEq)]
pub enum Value<V, C> {
    /// plain data
    Scalar(Scalar),
    /// a variable handle
    Var(V),
    /// a constraint handle
    Constr(C),
    /// a linear expression over variable handles
    Expr(LinExpr<V>),
}

impl<V, C> Value<V, C> {
    /// The data value, if the cell holds one
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// The variable handle, if the cell holds one
    pub fn as_var(&self) -> Option<&V> {
        match self {
            Value::Var(v) => Some(v),
            _ => None,
        }
    }
}

impl<V: Clone + fmt::Debug, C: fmt::Debug> Value<V, C> {
    /// The cell as a linear expression: numbers are constants, variables are
    /// single terms.
    pub fn to_lin_expr(&self) -> Result<LinExpr<V>> {
        match self {
            Value::Scalar(s) => s
                .as_f64()
                .map(LinExpr::from_constant)
                .ok_or_else(|| FrameError::NotLinear(format!("{:?}", s))),
            Value::Var(v) => Ok(LinExpr::from(v.clone())),
            Value::Expr(e) => Ok(e.clone()),
            Value::Constr(c) => Err(FrameError::NotLinear(format!("{:?}", c))),
        }
    }
}

/// Ordered row labels shared by the columns of a table
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Index {
    labels: Vec<Scalar>,
}

impl Index {
    /// Index with the given labels, which should be unique
    pub fn new(labels: Vec<Scalar>) -> Self {
        Index { labels }
    }

    /// Index `0, 1, ..., len - 1`
    pub fn range(len: usize) -> Self {
        (0..len).collect()
    }

    /// number of rows
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// label of the given row
    pub fn get(&self, row: usize) -> Option<&Scalar> {
        self.labels.get(row)
    }

    /// iterate over labels in row order
    pub fn iter(&self) -> std::slice::Iter<'_, Scalar> {
        self.labels.iter()
    }
}

impl<T: Into<Scalar>> std::iter::FromIterator<T> for Index {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Index::new(iter.into_iter().map(Into::into).collect())
    }
}

/// A single column detached from its table
#[derive(Clone, Debug, PartialEq)]
pub struct Series<V, C> {
    name: Option<String>,
    index: Index,
    values: Vec<Value<V, C>>,
}

impl<V, C> Series<V, C> {
    /// Fails if there is not exactly one value per index label
    pub fn new(name: Option<String>, index: Index, values: Vec<Value<V, C>>) -> Result<Self> {
        if values.len() != index.len() {
            return Err(FrameError::LengthMismatch {
                expected: index.len(),
                found: values.len(),
            });
        }
        Ok(Series {
            name,
            index,
            values,
        })
    }

    /// Column name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Row labels
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Values in row order
    pub fn values(&self) -> &[Value<V, C>] {
        &self.values
    }

    /// number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// whether the series is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// iterate over values in row order
    pub fn iter(&self) -> std::slice::Iter<'_, Value<V, C>> {
        self.values.iter()
    }
}

/// Named columns sharing one row index
#[derive(Clone, Debug, PartialEq)]
pub struct Table<V, C> {
    index: Index,
    columns: Vec<(String, Vec<Value<V, C>>)>,
}

impl<V, C> Table<V, C> {
    /// A table without columns
    pub fn new(index: Index) -> Self {
        Table {
            index,
            columns: vec![],
        }
    }

    /// A table without columns, indexed `0..len`
    pub fn range(len: usize) -> Self {
        Self::new(Index::range(len))
    }

    /// Append a column. Used to build tables from data.
    ///
    /// ```
    /// use lp_frames::lp_model::LpTable;
    ///
    /// let table = LpTable::range(2)
    ///     .with_column("cost", vec![1.5, 2.0]).unwrap()
    ///     .with_column("item", vec!["a", "b"]).unwrap();
    /// assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["cost", "item"]);
    /// ```
    pub fn with_column<S, I, T>(mut self, name: S, values: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<Value<V, C>>,
    {
        let name = name.into();
        let values: Vec<Value<V, C>> = values.into_iter().map(Into::into).collect();
        self.push_column(name, values)?;
        Ok(self)
    }

    fn push_column(&mut self, name: String, values: Vec<Value<V, C>>) -> Result<()> {
        if self.contains(&name) {
            return Err(FrameError::DuplicateColumn(name));
        }
        if values.len() != self.index.len() {
            return Err(FrameError::LengthMismatch {
                expected: self.index.len(),
                found: values.len(),
            });
        }
        self.columns.push((name, values));
        Ok(())
    }

    /// Row labels
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// number of rows
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Whether a column with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// Values of a column
    pub fn get(&self, name: &str) -> Option<&[Value<V, C>]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Values of a column, failing on unknown names
    pub fn values(&self, name: &str) -> Result<&[Value<V, C>]> {
        self.get(name)
            .ok_or_else(|| FrameError::UnknownColumn(name.to_string()))
    }
}

impl<V: Clone, C: Clone> Table<V, C> {
    /// A copy of a column, named after it
    pub fn column(&self, name: &str) -> Result<Series<V, C>> {
        let values = self.values(name)?.to_vec();
        Series::new(Some(name.to_string()), self.index.clone(), values)
    }

    /// A new table with the series appended as a column. The series must be
    /// named and share the table's index. `self` is left untouched.
    pub fn join(&self, series: Series<V, C>) -> Result<Table<V, C>> {
        if series.index != self.index {
            return Err(FrameError::IndexMismatch(series.name));
        }
        let name = series.name.ok_or(FrameError::UnnamedSeries)?;
        let mut joined = self.clone();
        joined.push_column(name, series.values)?;
        Ok(joined)
    }

    /// A new table without the given columns
    pub fn drop(&self, names: &[&str]) -> Result<Table<V, C>> {
        if let Some(missing) = names.iter().find(|n| !self.contains(n)) {
            return Err(FrameError::UnknownColumn(missing.to_string()));
        }
        Ok(Table {
            index: self.index.clone(),
            columns: self
                .columns
                .iter()
                .filter(|(n, _)| !names.contains(&n.as_str()))
                .cloned()
                .collect(),
        })
    }
}
