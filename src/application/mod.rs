// Application layer: the operation-level contract in front of the account
// store. Transport front-ends (CLI here, HTTP elsewhere) call only this.

mod error;
mod service;

pub use error::*;
pub use service::*;
