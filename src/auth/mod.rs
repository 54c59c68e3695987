pub mod session;
pub mod token_store;

pub use session::SessionStore;
pub use token_store::TokenStore;
