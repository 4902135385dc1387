pub mod availability;
pub mod matching;
pub mod recommendation;
pub mod session;
