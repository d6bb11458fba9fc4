//! Resource services. Every mutating operation takes the gate-verified
//! `Identity` and applies the ownership guard before touching the store;
//! none of them accept actor identity from anywhere else.

pub mod follower;
pub mod like;
pub mod reply;
pub mod tweet;
pub mod user;
