pub mod config;
pub mod observability;
pub mod pipeline;
pub mod publish;
pub mod record;
pub mod source;
