pub mod builder;

pub use builder::GraphBuilder;
