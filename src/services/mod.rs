pub mod expiry;
pub mod library;
pub mod session;
