//! Plain data exchanged with the backend and held by the controller.

pub mod page;
pub mod product;
pub mod query;

pub use page::*;
pub use product::*;
pub use query::*;
