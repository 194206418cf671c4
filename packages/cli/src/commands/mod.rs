//! One module per invocation mode

pub mod list;
pub mod review;
pub mod search;
