pub mod extractor;
pub mod fake_gateway;
pub mod gateway;
pub mod http_gateway;
pub mod prompts;
