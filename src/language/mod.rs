// Types representing parsed test documents and the values they evaluate to

mod error;
mod types;
mod value;

// Re-export all public symbols
pub use error::*;
pub use types::*;
pub use value::*;
