pub mod engine;
pub mod protocol;
pub mod turn;

pub mod prompt_builder;
pub mod llm_client;
pub mod response_parser;
pub mod exporter;
pub mod illustration;
