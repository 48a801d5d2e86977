#[allow(unused_imports)]
use anyhow::Result;
#[allow(unused_imports)]
use niche_scout::{
    clients::HttpGenerationClient,
    config::Config,
    orchestrator::{FailureClassifier, RequestOrchestrator},
    schemas::QueryParams,
};

#[tokio::test]
#[cfg(feature = "live_server")]
async fn test_live_generation() -> Result<()> {
    if std::env::var("RUN_LIVE_SERVER_TESTS").is_err() {
        eprintln!("Skipping live server test - set RUN_LIVE_SERVER_TESTS=1 to run");
        return Ok(());
    }

    let config = Config::load()?;
    let client = HttpGenerationClient::new(config.api.clone())?;
    let orchestrator =
        RequestOrchestrator::new(client, FailureClassifier::new(config.api.fallback_triggers));

    let result = orchestrator
        .submit(&QueryParams::new("coffee shops", "young professionals"))
        .await?;

    assert!(!result.questions.is_empty());
    assert!(result.metadata.get("fecha_generacion").is_some());
    println!("Generated {} questions", result.questions.len());

    Ok(())
}
