mod loader;

pub use loader::*;
