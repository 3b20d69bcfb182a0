pub mod error;
pub mod io;
pub mod ops;
pub mod plot;
pub mod poincare;
pub mod segment;
pub mod series;
pub mod stats;
pub mod validate;

pub use error::{RRiError, Result, TimeAxisViolation};
pub use ops::{ArithOp, CmpOp, Operand};
pub use poincare::PoincareSummary;
pub use segment::{SplitOptions, TimeSplit};
pub use series::{Field, FieldRef, RRi, RRiBuilder, SeriesKind};
pub use stats::{DescribeRow, Description, SeriesInfo, Statistic};
