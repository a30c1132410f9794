//! Small, self-contained data structures used across the project.

pub mod fixed_vec;
pub mod lane_bits;

pub use fixed_vec::FixedVec;
pub use lane_bits::LaneBits;
