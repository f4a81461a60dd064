//! Hosted backend (Supabase) implementation of the fight store

mod client;
pub mod types;

pub use client::SupabaseClient;
