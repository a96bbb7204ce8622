pub mod envelope;
pub mod format;
pub mod model;
pub mod normalize;
pub mod ranking;
