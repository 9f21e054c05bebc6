// Prompt catalog: remote prompt service client and the key*/sel* record adapter.
// The catalog is read-only here — prompts, categories and products are owned by the prompt service.

pub mod handlers;
pub mod placeholders;
pub mod repository;
