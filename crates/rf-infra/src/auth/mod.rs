mod in_memory_auth;

pub use in_memory_auth::InMemoryAuth;
