//! Cinedex core library.
//!
//! Pure decision logic for bulk metadata assignment on movie records:
//! field selectors, conflict analysis, mutation planning, sequential bulk
//! execution, and cover/gallery template expansion. The crate has no HTTP
//! or storage dependencies; data access goes through the traits in
//! [`store`].

pub mod analysis;
pub mod assignment;
pub mod bulk;
pub mod error;
pub mod executor;
pub mod plan;
pub mod selector;
pub mod store;
pub mod target;
pub mod template;
pub mod types;
