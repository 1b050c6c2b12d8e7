//! Artwork retrieval for tracks on Pro DJ Link players.
//!
//! See [`artwork::via_remote`] and [`artwork::via_local`].

pub mod artwork;
pub mod cli;
pub mod config;
pub mod domain;
pub mod storage;
