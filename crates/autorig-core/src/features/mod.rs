//! Built-in feature implementations.

mod fk;
mod foot_roll;

pub use fk::FkFeature;
pub use foot_roll::FootRollFeature;
