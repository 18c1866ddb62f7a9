pub mod classifier;
pub mod scanner;

pub use classifier::{classify, Classification};
pub use scanner::FlowLogScanner;
