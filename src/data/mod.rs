pub mod export;
pub mod extract;
pub mod layout;
pub mod loader;
pub mod parser;
pub mod record;
