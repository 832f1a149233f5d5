//! # kbrag-server
//!
//! A line-delimited JSON-RPC 2.0 server (spec.md §5/§6) exposing
//! `kbrag-core`'s retrieval engine over stdio to an editor front-end.
//!
//! ```text
//! stdin line -> RpcRequest -> dispatch::dispatch -> RpcResponse -> stdout line
//! ```

pub mod dispatch;
pub mod error;
pub mod params;
pub mod protocol;
pub mod state;
pub mod transport;

pub use error::ServerError;
pub use state::ServerState;
