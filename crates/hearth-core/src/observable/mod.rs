//! Publish/subscribe holders for application state.
//!
//! Independent of the registry. Subscribers are identified by handle, not by
//! closure contents, and are never removed automatically: an owner that goes
//! away must unsubscribe first.

mod list;
mod subscriber;
mod value;

pub use list::ObservableList;
pub use subscriber::Subscriber;
pub use value::Observable;
