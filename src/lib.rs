pub mod chain;
pub mod crypto;
pub mod error;
pub mod registry;
pub mod storage;
