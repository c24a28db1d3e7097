pub mod bundle;
pub mod error;
pub mod graph;
pub mod imports;
pub mod resolver;
pub mod scope;
pub mod symbols;

pub use bundle::*;
pub use error::*;
pub use graph::*;
pub use imports::*;
pub use resolver::*;
pub use scope::*;
pub use symbols::*;
