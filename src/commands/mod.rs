pub mod apply;
pub mod check;
pub mod deps;
pub mod fetch;
