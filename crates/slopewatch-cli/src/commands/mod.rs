//! Command implementations.

pub mod clear;
pub mod history;
pub mod latest;
pub mod record;
pub mod risk;

pub use self::clear::execute_clear;
pub use self::history::execute_history;
pub use self::latest::execute_latest;
pub use self::record::execute_record;
pub use self::risk::execute_risk;
