// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Service information, liveness and token acquisition.
pub mod root;
pub mod token;

pub use root::{health, root};
pub use token::token_post;
