//! Computer opponent strategy.

pub mod policy;

pub use policy::RerollPolicy;
