use crate::config::AppConfig;
use crate::errors::AppError;
use crate::services::ai::azure::AzureOpenAiProvider;
use crate::services::processor::IntentProcessor;
use crate::services::search::duckduckgo::DuckDuckGoSearch;

pub struct AppState {
    pub config: AppConfig,
    /// `None` when startup could not build the processor (missing credentials).
    pub processor: Option<IntentProcessor>,
}

impl AppState {
    /// Builds the processor from configuration. A failure is logged and leaves
    /// the service running but not ready.
    pub fn from_config(config: AppConfig) -> Self {
        let processor = match build_processor(&config) {
            Ok(processor) => {
                tracing::info!("intent processor initialized with Azure OpenAI");
                Some(processor)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to initialize intent processor");
                None
            }
        };

        Self { config, processor }
    }
}

fn build_processor(config: &AppConfig) -> Result<IntentProcessor, AppError> {
    let settings = config.azure_settings()?;
    let deployment = settings.deployment.clone();

    let llm = AzureOpenAiProvider::new(settings, config.request_timeout())
        .map_err(|e| AppError::Config(format!("{e:#}")))?;
    let search = DuckDuckGoSearch::new(config.request_timeout())
        .map_err(|e| AppError::Config(format!("{e:#}")))?;

    let span = tracing::info_span!("intent_processor", deployment = %deployment);
    Ok(IntentProcessor::new(Box::new(llm), Box::new(search)).with_span(span))
}
