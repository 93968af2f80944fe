//! Command implementations.

mod flag;
mod stream;
mod validate;

pub use flag::run_flag;
pub use stream::run_stream;
pub use validate::run_validate;
