pub mod approval_service;
pub mod auth_service;
pub mod cache_service;
pub mod client_email_service;
pub mod feed_service;
pub mod feedback_service;
pub mod scheduler_service;

pub use cache_service::{HttpMediaFetcher, MediaCache, MediaFetcher};
