pub mod prompts;
pub mod session;

pub use session::EditSession;
