mod session;

pub use session::MAX_SESSIONS;
pub use session::PendingAuth;
pub use session::SESSION_TTL;
pub use session::SessionStore;
