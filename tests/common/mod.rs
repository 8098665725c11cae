#![allow(dead_code)]

pub mod customers;
pub mod mocks;

pub use customers::*;
pub use mocks::{MockSink, MockSource};
