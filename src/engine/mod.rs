pub mod classify;
pub mod highlight;
pub mod metrics;
pub mod normalize;
pub mod scan;
pub mod words;
