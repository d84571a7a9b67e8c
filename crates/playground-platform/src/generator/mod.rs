//! Generator adapters: the AI collaborator behind `GeneratorPort`.

pub mod proxy;
pub mod gemini;

use std::rc::Rc;
use playground_core::ports::GeneratorPort;
use playground_types::{
    Result,
    config::{GeneratorBackend, GeneratorConfig},
};

pub use proxy::ProxyGenerator;
pub use gemini::GeminiGenerator;

/// Pick the generator backend named in the config.
pub fn create_generator(config: &GeneratorConfig) -> Result<Rc<dyn GeneratorPort>> {
    let generator: Rc<dyn GeneratorPort> = match config.backend {
        GeneratorBackend::Proxy => Rc::new(ProxyGenerator::new(&config.endpoint)),
        GeneratorBackend::Gemini => Rc::new(GeminiGenerator::new(config.clone())?),
    };
    log::info!("Generator backend: {}", generator.backend_name());
    Ok(generator)
}
