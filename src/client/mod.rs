//! In-process model of the mobile client's session handling: a persisted
//! token cache and an explicit auth state machine driven by confirmed
//! server responses.

pub mod session;
pub mod token_store;

pub use session::{AuthApi, AuthState, SessionManager};
pub use token_store::TokenStore;
