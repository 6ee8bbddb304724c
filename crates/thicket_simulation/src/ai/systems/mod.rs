//! AI systems: FSM step (pure) and its ECS wrapper.

pub mod fsm;


pub use fsm::*;
