mod pagination;
mod provider;

pub use pagination::*;
pub use provider::*;
