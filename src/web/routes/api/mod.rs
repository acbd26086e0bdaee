pub mod subscribe;

pub use subscribe::{method_not_allowed, subscribe};
