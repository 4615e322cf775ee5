//! Analysis module - statistics computed over the encoded dataset

pub mod cohorts;
pub mod correlation;
pub mod distribution;
pub mod frame;
pub mod missing;
pub mod summary;

pub use cohorts::*;
pub use correlation::*;
pub use distribution::*;
pub use frame::*;
pub use missing::*;
pub use summary::*;
