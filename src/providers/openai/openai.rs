use async_trait::async_trait;
use crate::config::ProviderConfig;
use crate::providers::traits::{
    ChatError, ChatMessage, ChatRole, CompletionProvider, EmbeddingError, EmbeddingProvider,
};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateEmbeddingRequestArgs, EmbeddingInput,
    },
    Client,
};

#[derive(Clone)]
pub struct OpenAIProvider {
    client: Client<OpenAIConfig>,
    chat_model: String,
    embedding_model: String,
    temperature: f32,
}

impl OpenAIProvider {
    /// Builds a client; with no explicit key async-openai falls back to `OPENAI_API_KEY`.
    pub fn new(api_key: Option<String>, config: &ProviderConfig) -> Self {
        let mut openai_config = OpenAIConfig::new();
        if let Some(key) = api_key {
            openai_config = openai_config.with_api_key(key);
        }

        Self {
            client: Client::with_config(openai_config),
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
            temperature: config.temperature,
        }
    }

    fn to_request_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage, OpenAIError> {
        let content = message.content.as_str();
        Ok(match message.role {
            ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(content)
                .build()?
                .into(),
            ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                .content(content)
                .build()?
                .into(),
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let messages = messages
            .iter()
            .map(Self::to_request_message)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ChatError::Provider(e.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.chat_model)
            .temperature(self.temperature)
            .messages(messages)
            .build()
            .map_err(|e| ChatError::Provider(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| ChatError::Provider(e.to_string()))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(ChatError::EmptyResponse)
    }

    fn get_model_info(&self) -> String {
        self.chat_model.clone()
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.embedding_model)
            .input(EmbeddingInput::StringArray(texts.to_vec()))
            .build()
            .map_err(|e| EmbeddingError::Provider(e.to_string()))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| EmbeddingError::Provider(e.to_string()))?;

        if response.data.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: response.data.len(),
            });
        }

        let mut data = response.data;
        data.sort_by_key(|embedding| embedding.index);
        Ok(data.into_iter().map(|embedding| embedding.embedding).collect())
    }

    fn model_name(&self) -> &str {
        &self.embedding_model
    }
}
