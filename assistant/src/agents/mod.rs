pub mod generator;
pub mod normalizer;
pub mod retriever;

pub use generator::{GenerateRequest, Generation, Generator, VertexGeminiClient};
pub use normalizer::ParseMode;
pub use retriever::{DiscoveryEngineClient, RetrieverAgent, SearchBackend};
