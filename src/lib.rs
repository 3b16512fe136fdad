//! Clinical-record extraction and indexing service.
//!
//! Turns raw medical free text (or the text layer of a PDF) into a
//! schema-validated structured record via a Mistral chat model, segments
//! the record into passages and indexes them in Qdrant for semantic search.

pub mod api;
pub mod pipeline;
pub mod settings;
