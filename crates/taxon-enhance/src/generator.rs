//! The seam between the pipeline and a text-generation service.

use async_trait::async_trait;

use crate::error::GeneratorError;

/// One single-turn request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Anything that can turn a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model or backend name, for logs.
    fn name(&self) -> &str;

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError> {
        (**self).generate(request).await
    }
}
