//! Yatube: group and author timelines, follower feeds and a cached home timeline.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod util;
