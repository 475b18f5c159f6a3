// supabase/mod.rs - Client for the hosted database/auth/storage platform
//
// Speaks the three REST surfaces the handlers need:
//   /rest/v1/*     PostgREST table queries   (query_builder.rs)
//   /auth/v1/*     GoTrue user management    (auth.rs)
//   /storage/v1/*  object storage            (storage.rs)

pub mod auth;
pub mod client;
pub mod error;
pub mod query_builder;
pub mod storage;

pub use auth::{AuthUser, Session, UserAttributes};
pub use client::SupabaseClient;
pub use error::SupabaseError;
pub use query_builder::QueryBuilder;
