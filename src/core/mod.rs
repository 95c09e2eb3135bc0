pub mod deps;
pub mod fetch;
pub mod manifest;
pub mod paths;
