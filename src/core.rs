pub mod candidate;
pub mod generator;
pub mod interval;
pub mod normalizer;
pub mod phase;
pub mod planner;
pub mod policy;
pub mod scheduler;
pub mod slot;
pub mod timeline;
pub mod timestamp;
