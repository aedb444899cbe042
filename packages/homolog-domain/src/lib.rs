pub mod band;
pub mod description;
pub mod normalize;
pub mod policy;
pub mod verdict;
