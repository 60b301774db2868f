pub mod enums;
pub mod document;
pub mod result;

pub use enums::*;
pub use document::*;
pub use result::*;
