// upload-prep/src/processors/mod.rs
mod batch;
mod exporter;
mod loader;
mod normalizer;
mod resizer;
mod scanner;

pub use batch::BatchProcessor;
pub use exporter::Exporter;
pub use loader::Loader;
pub use normalizer::Normalizer;
pub use resizer::Resizer;
pub use scanner::Scanner;

pub mod prelude {
    pub use super::{BatchProcessor, Exporter, Loader, Normalizer, Resizer, Scanner};
}
