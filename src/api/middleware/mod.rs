//! HTTP middleware

pub mod logging;
pub mod request_meta;
pub mod security;
pub mod session;
pub mod trailing_slash;

pub use logging::logging_middleware;
pub use request_meta::RequestMeta;
pub use security::security_headers_middleware;
pub use session::CurrentUser;
pub use trailing_slash::trailing_slash_middleware;
