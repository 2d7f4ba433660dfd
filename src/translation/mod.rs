/*!
 * Document translation: chunking, backends and dispatch.
 *
 * This module contains the core functionality for translating extracted
 * document text. It is split into several submodules:
 *
 * - `chunker`: Token-bounded grouping of lines into chunks
 * - `backend`: LLM and machine-translation backends
 * - `core`: Service validation and per-chunk routing
 * - `batch`: Concurrent, order-preserving dispatch of chunks
 * - `concurrency`: Per-service pool width defaults
 */

// Re-export main types for easier usage
pub use self::backend::{Translate, TranslationBackend, TranslationRequest, TranslationResult};
pub use self::batch::BatchTranslator;
pub use self::chunker::{chunk_lines, CHUNK_SEPARATOR};
pub use self::core::{ChunkPayload, TranslationServiceProvider};

// Submodules
pub mod backend;
pub mod batch;
pub mod chunker;
pub mod concurrency;
pub mod core;
