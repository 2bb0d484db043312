pub mod client;
pub mod portrait;
pub mod types;

pub use client::GeminiHttpClient;
pub use portrait::GeminiPortraitClient;
pub use types::GenerateContentResponse;
