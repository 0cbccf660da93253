//! Consumer side of the list views: a pure paging state machine plus the I/O that drives it.

pub mod controller;
pub mod debounce;
pub mod session;
pub mod source;

mod error;

pub use controller::{ControllerState, Intent, ListController, PagingStyle, PlannedRequest, Step};
pub use debounce::SearchDebouncer;
pub use error::{Error, Result};
pub use session::Session;
pub use source::{BoxFuture, HEADER_CALLER_ID, HttpListSource, ListSource};
