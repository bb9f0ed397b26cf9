mod outcome;
mod result_set;
mod row;
mod sql_value;
mod value_map;

pub use outcome::{QueryOutcome, TxFailure, TxOutcome};
pub use result_set::{FetchMode, FetchedRow, ResultSet};
pub use row::{RawOutcome, RawQueryResult, Row};
pub use sql_value::SqlValue;
pub use value_map::ValueMap;
