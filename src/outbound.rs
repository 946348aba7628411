pub mod db;
pub mod mailer;
pub mod mailing_list;
pub mod telemetry;
