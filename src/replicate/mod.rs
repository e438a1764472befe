pub mod client;

pub use client::ReplicateClient;
