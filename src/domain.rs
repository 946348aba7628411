pub mod admin;
pub mod contact;
pub mod mail;
pub mod subscription;

#[cfg(test)]
pub(crate) mod testing;
