pub mod authentication;
pub mod error_handling;
pub mod inject_headers;
pub mod retry_idempotent;
