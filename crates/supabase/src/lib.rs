//! Adapters for the hosted catalog store: PostgREST product listing and the
//! `generate-recommendations` edge function.

pub mod catalog;
pub mod client;
pub mod error;
pub mod scoring;

pub use catalog::SupabaseCatalog;
pub use client::SupabaseClient;
pub use error::SupabaseError;
pub use scoring::RemoteScoringStrategy;
