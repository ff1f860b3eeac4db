//! Facade over the layered crates so callers can depend on one package.

pub use application;
pub use domain;
pub use infrastructure;
