pub mod mailerlite_client;
