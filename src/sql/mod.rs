//! SQL text handling: literal encoding, template interpolation, script
//! splitting and statement inspection.

mod dialect;
mod encode;
mod interpolate;
mod split;
mod statement;

pub use dialect::Dialect;
pub use encode::{encode, DATETIME_FORMAT};
pub use interpolate::interpolate;
pub use split::split_statements;
pub use statement::{insert_target, is_insert};
