pub mod config;
pub mod eval;
pub mod run;
pub mod simulate;
