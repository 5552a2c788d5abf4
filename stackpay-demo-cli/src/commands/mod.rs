//! CLI command implementations

pub mod config;
pub mod convert;
pub mod init;
pub mod link;
pub mod pay;
pub mod receipts;
