pub mod auth;
pub mod body;
pub mod response;

pub use auth::{admin_client, authorize, extract_bearer, AccessPolicy};
pub use body::JsonBody;
pub use response::{ApiResponse, ApiResult};
