use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("invalid supabase url `{url}`: {source}")]
    InvalidUrl { url: String, source: url::ParseError },
    #[error("supabase request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("supabase answered HTTP {status}")]
    Status { status: u16 },
}
