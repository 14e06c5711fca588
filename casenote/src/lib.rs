//! Casenote: self-hostable medical case management with LLM-generated
//! case summaries.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod models;
pub mod services;
