mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod session;

pub(crate) use cookie::DEFAULT_COOKIE_DURATION;
pub(crate) use cookie::{invalidate_session_cookie, set_session_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, SessionExpired, auth_guard, auth_guard_hx};
pub(crate) use redirect::{build_log_in_redirect_url, normalize_redirect_url};
pub use session::Session;

#[cfg(test)]
pub(crate) use cookie::COOKIE_SESSION;
