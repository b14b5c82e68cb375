// Network adapter for client WebSocket sessions.

pub mod client;

pub use client::{spawn_arena_serializer, ws_handler};
