// User profiles: embed skills/interests and persist them to the vector index.

pub mod embedding;
pub mod handlers;
pub mod store;
