//! Writing problems in the CPLEX .lp text format.
//!
//! A problem is written as four sections: the objective, the `Subject To`
//! rows, the `Bounds` of each variable, and the `Generals` / `Binaries`
//! lists of integer variables.
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Formatter;
use std::io;
use std::io::prelude::*;

use tempfile::NamedTempFile;

use crate::model::VarType;

/// Optimization sense
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum LpObjective {
    /// min
    Minimize,
    /// max
    Maximize,
}

impl Default for LpObjective {
    fn default() -> Self {
        LpObjective::Minimize
    }
}

impl LpObjective {
    fn header(self) -> &'static str {
        match self {
            LpObjective::Minimize => "Minimize",
            LpObjective::Maximize => "Maximize",
        }
    }
}

/// Something that can appear in a .lp file, such as a linear expression.
///
/// Names written by implementors must be valid .lp identifiers; see
/// [crate::util::UniqueNameGenerator].
pub trait WriteToLpFileFormat {
    /// Write the object to the given formatter in the .lp format
    fn to_lp_file_format(&self, f: &mut fmt::Formatter) -> fmt::Result;
}

impl<'a, T: WriteToLpFileFormat> WriteToLpFileFormat for &'a T {
    fn to_lp_file_format(&self, f: &mut Formatter) -> fmt::Result {
        (**self).to_lp_file_format(f)
    }
}

/// A column of the problem. See [crate::problem::Variable].
pub trait AsVariable {
    /// Identifier, unique in the problem
    fn name(&self) -> &str;
    /// Whether the variable is continuous, integer or binary
    fn var_type(&self) -> VarType;
    /// `-INFINITY` when unbounded below
    fn lower_bound(&self) -> f64;
    /// `INFINITY` when unbounded above
    fn upper_bound(&self) -> f64;
}

impl<'a, T: AsVariable> AsVariable for &'a T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn var_type(&self) -> VarType {
        (**self).var_type()
    }

    fn lower_bound(&self) -> f64 {
        (**self).lower_bound()
    }

    fn upper_bound(&self) -> f64 {
        (**self).upper_bound()
    }
}

/// A row `lhs operator rhs`, with a constant right-hand side
pub struct Constraint<E> {
    /// Row label. Rows without a label are written as `c<position>`
    pub name: String,
    /// left hand side of the constraint
    pub lhs: E,
    /// `Less` for `<=`, `Equal` for `=`, `Greater` for `>=`
    pub operator: Ordering,
    /// right-hand side of the constraint
    pub rhs: f64,
}

fn operator_symbol(operator: Ordering) -> &'static str {
    match operator {
        Ordering::Less => "<=",
        Ordering::Equal => "=",
        Ordering::Greater => ">=",
    }
}

impl<E: WriteToLpFileFormat> WriteToLpFileFormat for Constraint<E> {
    fn to_lp_file_format(&self, f: &mut Formatter) -> fmt::Result {
        self.lhs.to_lp_file_format(f)?;
        write!(f, " {} {}", operator_symbol(self.operator), self.rhs)
    }
}

/// A problem that can be written as a .lp file and handed to a solver
pub trait LpProblem<'a>: Sized {
    /// variable type
    type Variable: AsVariable;
    /// expression type
    type Expression: WriteToLpFileFormat;
    /// Iterator over constraints
    type ConstraintIterator: Iterator<Item = Constraint<Self::Expression>>;
    /// Iterator over variables
    type VariableIterator: Iterator<Item = Self::Variable>;

    /// problem name, written as a comment and used as the temporary file prefix
    fn name(&self) -> &str {
        "lp_frames_problem"
    }
    /// all variables, in column order
    fn variables(&'a self) -> Self::VariableIterator;
    /// function to optimize
    fn objective(&'a self) -> Self::Expression;
    /// whether the objective is minimized or maximized
    fn sense(&'a self) -> LpObjective;
    /// all rows, in order
    fn constraints(&'a self) -> Self::ConstraintIterator;

    /// Write the whole problem
    fn to_lp_file_format(&'a self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "\\ {}\n", self.name())?;
        write_objective(self, f)?;
        write_rows(self, f)?;
        write_columns(self, f)?;
        f.write_str("\nEnd\n")
    }

    /// The problem as a value whose `Display` output is the .lp file
    fn display_lp(&'a self) -> DisplayedLp<'a, Self> {
        DisplayedLp(self)
    }

    /// Write the problem to a new temporary `.lp` file, removed when dropped
    fn to_tmp_file(&'a self) -> io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix(self.name())
            .suffix(".lp")
            .tempfile()?;
        write!(file, "{}", self.display_lp())?;
        file.flush()?;
        Ok(file)
    }
}

/// A problem whose `Display` implementation outputs valid .lp syntax
pub struct DisplayedLp<'a, P>(&'a P);

impl<'a, P: LpProblem<'a>> fmt::Display for DisplayedLp<'a, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.to_lp_file_format(f)
    }
}

fn write_objective<'a>(prob: &'a impl LpProblem<'a>, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}\n  obj: ", prob.sense().header())?;
    prob.objective().to_lp_file_format(f)
}

fn write_rows<'a>(prob: &'a impl LpProblem<'a>, f: &mut Formatter) -> fmt::Result {
    let mut rows = prob.constraints().enumerate().peekable();
    if rows.peek().is_none() {
        return Ok(());
    }
    f.write_str("\n\nSubject To\n")?;
    for (position, row) in rows {
        if row.name.is_empty() {
            write!(f, "  c{}: ", position)?;
        } else {
            write!(f, "  {}: ", row.name)?;
        }
        row.to_lp_file_format(f)?;
        f.write_str("\n")?;
    }
    Ok(())
}

/// The bound of a variable as a `Bounds` entry.
/// Variables without bounds are `free`; a missing lower bound must be
/// written explicitly since .lp files default it to 0.
fn write_bound(f: &mut Formatter, name: &str, low: f64, up: f64) -> fmt::Result {
    match (low.is_finite(), up.is_finite()) {
        (false, false) => write!(f, "  {} free", name),
        (true, false) => write!(f, "  {} <= {}", low, name),
        (false, true) => write!(f, "  -inf <= {} <= {}", name, up),
        (true, true) => write!(f, "  {} <= {} <= {}", low, name, up),
    }
}

fn write_columns<'a>(prob: &'a impl LpProblem<'a>, f: &mut Formatter) -> fmt::Result {
    let mut generals = vec![];
    let mut binaries = vec![];
    f.write_str("\nBounds\n")?;
    for variable in prob.variables() {
        write_bound(
            f,
            variable.name(),
            variable.lower_bound(),
            variable.upper_bound(),
        )?;
        f.write_str("\n")?;
        match variable.var_type() {
            VarType::Continuous => {}
            VarType::Integer => generals.push(variable.name().to_string()),
            VarType::Binary => binaries.push(variable.name().to_string()),
        }
    }
    for (section, names) in [("Generals", generals), ("Binaries", binaries)].iter() {
        if names.is_empty() {
            continue;
        }
        write!(f, "\n{}\n", section)?;
        for name in names {
            writeln!(f, "  {}", name)?;
        }
    }
    Ok(())
}
