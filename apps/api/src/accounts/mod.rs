// Account lifecycle: registration, credential checks and their HTTP handlers.

pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod password;
pub mod repository;
pub mod store;
pub mod validation;
