//! Controller layer: UI events, submission transitions, and command orchestration.

pub mod events;
pub mod orchestration;
