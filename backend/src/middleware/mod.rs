//! Request middleware.
//!
//! Purpose: Define the filter chain wrapped around the `/webapi` scope. The
//! stages run in a fixed order: origin check first, then request logging.

pub mod origin;
pub mod request_log;

pub use origin::OriginCheck;
pub use request_log::RequestLog;
