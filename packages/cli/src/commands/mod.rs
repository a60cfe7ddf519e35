pub mod analyze;
pub mod init;
pub mod transpile;

pub use analyze::{analyze, AnalyzeArgs};
pub use init::{init, InitArgs};
pub use transpile::{transpile, TranspileArgs};
