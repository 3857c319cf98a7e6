#![deny(missing_docs)]
//! Build optimization models from tables.
//!
//! A [table::Table] holds named columns of data sharing one row index.
//! Its model-building methods create one variable or constraint per row in a
//! [model::Model] and return a copy of the table with the new handles joined
//! as a column, aligned to the rows they were built from:
//!
//!  - [table::Table::add_vars] and [table::Index::add_vars] create variables,
//!    with bounds read from columns or given as constants,
//!  - [table::Table::add_lconstrs] adds `lhs sense rhs` constraints from
//!    columns and constants,
//!  - [table::Table::add_constrs] adds constraints written as a comparison
//!    over column names, such as `"2 * x + y <= cap"`,
//!  - [table::Series::get_attr] and [table::Series::get_value] read
//!    attributes and solution values back.
//!
//! [lp_model::LpModel] is a model kept in memory that writes problems in the
//! .lp format and solves them with external programs (see [solvers]).

pub mod error;
pub mod frame;
pub mod linear;
pub mod lp_format;
pub mod lp_model;
pub mod model;
pub mod parse;
pub mod problem;
mod projection;
pub mod resolve;
pub mod solvers;
pub mod table;
pub mod util;
