pub mod edge;
pub mod node;
pub mod types;

pub use edge::*;
pub use node::*;
pub use types::*;
