pub mod types;
pub mod board;
pub mod catalog;
pub mod movegen;
pub mod coverage;
pub mod game;
