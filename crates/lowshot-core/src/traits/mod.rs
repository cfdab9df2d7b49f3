//! Interface traits implemented across crates.

mod api;
mod learner;

pub use api::IBenchmarkApi;
pub use learner::ILearner;
