//! Data models shared by the extraction pipeline.

pub mod config;
pub mod payslip;
pub mod record;
