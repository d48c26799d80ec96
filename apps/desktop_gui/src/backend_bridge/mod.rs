//! Backend bridge: command types and the worker that executes them.

pub mod commands;
pub mod runtime;
