mod heuristic;

pub use heuristic::*;
