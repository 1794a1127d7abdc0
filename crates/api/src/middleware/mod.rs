//! HTTP middleware and extractors.
//!
//! - `auth` - Session guard (`RequireLogin`) and login/logout session helpers
//! - `request_id` - `x-request-id` propagation
//! - `session` - tower-sessions layer construction

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{RequireLogin, current_login, end_session, start_session};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
