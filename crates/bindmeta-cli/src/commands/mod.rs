pub mod check;
pub mod constants;
pub mod ledger_check;
pub mod resolve;
pub mod schema;
pub mod substitute;
pub mod version;
