pub mod contact;
pub mod health_check;
pub mod subscribe;
pub mod subscribers;
pub mod unsubscribe;

pub use contact::contact;
pub use health_check::health_check;
pub use subscribe::subscribe;
pub use subscribers::{import_subscribers, list_subscribers};
pub use unsubscribe::{unsubscribe, unsubscribe_link};
