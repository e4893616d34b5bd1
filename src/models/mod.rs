pub mod approval;
pub mod cache_metadata;
pub mod client_email;
pub mod feed;
pub mod feedback;
pub mod key;
pub mod scheduler_plan;
pub mod user;

pub use approval::*;
pub use cache_metadata::*;
pub use client_email::*;
pub use feed::*;
pub use feedback::*;
pub use key::*;
pub use scheduler_plan::*;
pub use user::*;
