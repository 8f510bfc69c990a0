pub mod dataset;
pub mod recommendation;
