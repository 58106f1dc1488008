pub mod mocks;

pub use mocks::{MockFile, MockLines};
