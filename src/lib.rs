pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod forecast;
pub mod github;
pub mod model;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod window;
