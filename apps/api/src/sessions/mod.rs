// Server-side sessions: opaque token in a cookie, record in Redis.

pub mod cookie;
pub mod issuer;
#[cfg(test)]
pub mod memory;
pub mod store;
