pub mod http;
pub mod traits;

pub use http::HttpGenerationClient;
pub use traits::{ApiError, Endpoint, GenerationApi};
