pub mod postgrest;

pub use postgrest::PostgrestProvider;
