//! Application use cases (business logic orchestration).

mod run_contract;

pub use run_contract::*;
