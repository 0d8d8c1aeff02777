//! Employees module (generated-id entities).

pub mod employee;

pub use employee::{seed, Employee, NewEmployee};
