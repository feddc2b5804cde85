//! Session engine: shared state, protocol event dispatch, command
//! interpretation and the output queue.

pub mod action;
pub mod event;
pub mod handler;
pub mod interpreter;
pub mod state;
