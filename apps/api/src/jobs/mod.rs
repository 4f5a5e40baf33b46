// Job listings: parse model output and build outbound job board links.

pub mod handlers;
pub mod parser;
pub mod platforms;
