pub mod extraction;
pub mod structuring;
pub mod backend;
pub mod strategy;
pub mod assembler;
pub mod processor;
