pub mod council;
pub mod generation_config;
pub mod narrative_stats;
pub mod parsed_document;
pub mod session_state;
pub mod story_forest;
pub mod story_node;
pub mod text;
