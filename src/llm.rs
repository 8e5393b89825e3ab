//! Text-generation model trait and the site/keyword generator built on it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::extract::string_list;
use crate::Result;

/// Trait for text-generation backends.
///
/// A model takes a single user prompt and returns the raw generated text.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Returns the model identifier.
    fn model_id(&self) -> &str;

    /// Sends `prompt` to the model and returns its text output.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

const SITES_PROMPT: &str = r#"
게임 리뷰와 관련된 유명 웹사이트 도메인 5개를 생성해줘.
예: naver.com, inven.co.kr, gamespot.com 같은 형식.
결과를 반드시 JSON 형식으로 반환해줘:
{
  "sites": ["site1", "site2", ...]
}
"#;

fn keywords_prompt(game_name: &str) -> String {
    format!(
        r#"
다음 게임 '{game_name}'에 대한 리뷰를 검색하려고 하는데 한국 웹사이트에서 어떤 검색 키워드로 검색하면 잘 나올 지 5개 생성해줘. 참고로 해당 게임의 은어로 쓰이는 단어도 고려해줘. 리뷰라는 단어 뿐 아니라 후기, 비평 등의 단어도 섞어서 생성해줘
결과를 반드시 JSON 형식으로 반환해줘:
{{
  "keywords": ["키워드1", "키워드2", ...]
}}
"#
    )
}

/// Generates review sites and search keywords through a [`TextModel`].
pub struct LlmClient {
    model: Arc<dyn TextModel>,
}

impl LlmClient {
    /// Creates a client backed by `model`.
    pub fn new<M: TextModel + 'static>(model: M) -> Self {
        Self {
            model: Arc::new(model),
        }
    }

    /// Creates a client sharing an existing model.
    pub fn with_model(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// Asks the model for well-known game review site domains.
    pub async fn generate_sites(&self) -> Result<Vec<String>> {
        let sites = self.ask(SITES_PROMPT, "sites").await?;
        info!("Model suggested {} sites", sites.len());
        Ok(sites)
    }

    /// Asks the model for search keywords about `game_name`.
    pub async fn generate_keywords(&self, game_name: &str) -> Result<Vec<String>> {
        let keywords = self.ask(&keywords_prompt(game_name), "keywords").await?;
        info!("Model suggested {} keywords for '{}'", keywords.len(), game_name);
        Ok(keywords)
    }

    async fn ask(&self, prompt: &str, field: &str) -> Result<Vec<String>> {
        debug!("Prompting {} for '{}'", self.model.model_id(), field);
        let text = self.model.complete(prompt).await?;
        debug!("Model output: {}", text);
        string_list(&text, field)
    }
}
