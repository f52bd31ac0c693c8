//! occusearch server — HTTP REST API for the multilingual occupation-search service.
//!
//! - **Search**: dense vector similarity with a multi-stage query-rescue cascade
//!   (synonym expansion, translation rescue, lexical fallback) and confidence gating.
//! - **Occupation lookup**: direct record retrieval by NCO code.
//! - **Feedback**: append-only audit logging of helpful/not-helpful signals.
//! - **Admin**: log inspection and retention, synonym bank updates, and snapshot
//!   reindexing, all behind a shared admin-token gate.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
