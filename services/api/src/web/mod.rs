pub mod rest;
pub mod state;

// Re-export the handlers to make them easily accessible to the binary
// that builds the web server router.
pub use rest::{list_questions_handler, list_tags_handler};
