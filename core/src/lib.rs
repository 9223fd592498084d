pub mod amount;
pub mod bank_relation;
pub mod clock;
pub mod config;
pub mod customer_code;
pub mod entities;
pub mod error;
pub mod format;
pub mod generator;
pub mod persistence;
pub mod planner;
pub mod reconcile;
pub mod retry;
pub mod storage;
pub mod store;
pub mod text;
pub mod types;
pub mod validator;
pub mod worker_pool;
