//! Application services — one module per use-case.

pub mod doctor;
pub mod run;
