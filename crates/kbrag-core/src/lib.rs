//! # kbrag-core
//!
//! Retrieval-augmented keybinding search engine.
//!
//! Given a natural-language phrase ("delete a word") this crate returns a
//! ranked list of vim/neovim keybindings, each annotated with why it
//! matched. It owns the retrieval, ranking, and incremental-index
//! pipeline; the editor UI, the concrete vector database, and the
//! embedding-capable LLM are external collaborators reached through the
//! [`vectorstore::VectorStore`] and [`llm::LLMClient`] capability traits.
//!
//! ```text
//! Server.Query -> Agent.ProcessQuery -> QueryProcessor.Process
//!              -> (CollectionRouter.SearchAll || ResponseGenerator.Generate)
//!              -> ResponseGenerator.Rank -> Server reply
//! ```
//!
//! ## Modules
//!
//! - [`keybinding`] - the domain entity, parsing, validation, content hash.
//! - [`vectorstore`] - the `VectorStore` capability and its backends.
//! - [`llm`] - the `LLMClient` capability and its backends.
//! - [`router`] - the multi-collection fan-out + merge.
//! - [`vectorizer`] - incremental embedding/indexing of user keybindings.
//! - [`query`] - query normalization, expansion, intent classification.
//! - [`response`] - LLM prompt/parse and fusion ranking.
//! - [`agent`] - orchestrates one query end to end.
//! - [`metrics`] - per-request latency/success counters.
//! - [`health`] - periodic dependency health checks + bounded restart.
//! - [`config`] - environment-backed configuration.
//! - [`error`] - the client/server error taxonomy and RPC code mapping.

#![warn(missing_docs)]

pub mod agent;
pub mod config;
pub mod error;
pub mod hashing;
pub mod health;
pub mod keybinding;
pub mod llm;
pub mod metrics;
pub mod query;
pub mod response;
pub mod router;
pub mod vectorizer;
pub mod vectorstore;

pub use agent::{Agent, AgentError};
pub use config::Config;
pub use error::{CoreError, ErrorBand};
pub use keybinding::{Keybinding, Mode};
pub use llm::LLMClient;
pub use router::CollectionRouter;
pub use vectorizer::Vectorizer;
pub use vectorstore::VectorStore;
