//! Route handlers

pub mod info;
pub mod predict;
