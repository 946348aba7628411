pub mod email;
pub mod email_log;
pub mod name;
pub mod subscriber;
