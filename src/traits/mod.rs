mod backend;
mod driver;

pub use backend::Backend;
pub use driver::DatabaseDriver;
