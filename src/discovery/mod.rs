/// Filesystem discovery
///
/// Finds project directories and derives their descriptions.

pub mod discoverer;
pub mod extractor;

pub use discoverer::Discoverer;
pub use extractor::DescriptionExtractor;
