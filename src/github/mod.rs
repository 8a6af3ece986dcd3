pub mod client;
pub mod fetcher;
pub mod graph;
pub mod model;
pub mod search;

pub use client::HostingClient;
pub use fetcher::{ActivitySource, Fetched};
pub use model::{RawRecord, RepositoryStats};
