//! API Routes

pub mod predict;
