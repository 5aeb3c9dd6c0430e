pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{AdminOnly, Authenticated};
pub use extract::{Json, Path, Query};
pub use response::{ApiResponse, ApiResult};
