//! HTTP client and end-to-end pipeline against a mock server.

use mockito::{Matcher, Server};
use niche_scout::clients::{ApiError, Endpoint, GenerationApi, HttpGenerationClient};
use niche_scout::config::{ApiConfig, DEFAULT_FALLBACK_TRIGGERS, ExportConfig};
use niche_scout::controller::ScoutController;
use niche_scout::error::NicheScoutError;
use niche_scout::orchestrator::{FailureClassifier, RequestOrchestrator};
use niche_scout::render::ResultRenderer;
use niche_scout::schemas::QueryParams;
use serde_json::json;

fn client_for(server: &Server) -> HttpGenerationClient {
    HttpGenerationClient::new(ApiConfig {
        base_url: server.url(),
        timeout_ms: 5_000,
        ..Default::default()
    })
    .unwrap()
}

fn orchestrator_for(server: &Server) -> RequestOrchestrator<HttpGenerationClient> {
    let triggers = DEFAULT_FALLBACK_TRIGGERS.iter().map(|s| s.to_string()).collect();
    RequestOrchestrator::new(client_for(server), FailureClassifier::new(triggers))
}

fn generation_body() -> serde_json::Value {
    json!({
        "preguntas": [
            {"titulo": "TENDENCIAS", "pregunta": "¿Qué está de moda?", "contexto": "Estacionalidad."},
            {"titulo": "", "pregunta": "¿Quién compra?", "contexto": ""}
        ],
        "metadatos": {
            "nicho": "coffee shops",
            "audiencia": "young professionals",
            "ubicacion": "",
            "plataforma": "",
            "fecha_generacion": "2024-05-01 10:00:00"
        }
    })
}

#[tokio::test]
async fn health_parses_model_info() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"status": "ok", "message": "up", "model_info": "No hay modelo disponible"})
                .to_string(),
        )
        .create_async()
        .await;

    let status = client_for(&server).health().await.unwrap();
    assert_eq!(status.status.as_deref(), Some("ok"));
    assert!(!status.model_available());
    mock.assert_async().await;
}

#[tokio::test]
async fn generate_posts_server_field_names() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/generar_preguntas_gemini")
        .match_body(Matcher::Json(json!({
            "nicho": "coffee shops",
            "audiencia": "young professionals",
            "ubicacion": "",
            "plataforma": "TikTok"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(generation_body().to_string())
        .create_async()
        .await;

    let params = QueryParams::new("coffee shops", "young professionals").with_platform("TikTok");
    let result = client_for(&server)
        .generate(Endpoint::Primary, &params)
        .await
        .unwrap();
    assert_eq!(result.questions.len(), 2);
    assert_eq!(result.questions[1].title, None);
    mock.assert_async().await;
}

#[tokio::test]
async fn non_json_error_page_is_still_a_status_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/generar_preguntas_gemini")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let err = client_for(&server)
        .generate(Endpoint::Primary, &QueryParams::new("a", "b"))
        .await
        .unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 502);
            assert!(body.error.is_none());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn pipeline_falls_back_to_basic_generator() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"model_info": "gemini-pro"}).to_string())
        .create_async()
        .await;
    let primary = server
        .mock("POST", "/generar_preguntas_gemini")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(json!({"error": "Error al generar contenido: 404 models/gemini-pro"}).to_string())
        .expect(1)
        .create_async()
        .await;
    let fallback = server
        .mock("POST", "/generar_preguntas_basicas")
        .match_body(Matcher::PartialJson(json!({"nicho": "coffee shops"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(generation_body().to_string())
        .expect(1)
        .create_async()
        .await;

    let orch = orchestrator_for(&server);
    let result = orch
        .submit(&QueryParams::new("coffee shops", "young professionals"))
        .await
        .unwrap();
    assert_eq!(result.questions[0].title.as_deref(), Some("TENDENCIAS"));

    primary.assert_async().await;
    fallback.assert_async().await;
    assert!(orch.session().has_result().await);
}

#[tokio::test]
async fn pipeline_reports_unrelated_500_without_fallback() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"model_info": "gemini-pro"}).to_string())
        .create_async()
        .await;
    server
        .mock("POST", "/generar_preguntas_gemini")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(json!({"error": "Error al procesar la solicitud: boom"}).to_string())
        .create_async()
        .await;
    let fallback = server
        .mock("POST", "/generar_preguntas_basicas")
        .expect(0)
        .create_async()
        .await;

    let err = orchestrator_for(&server)
        .submit(&QueryParams::new("coffee shops", "young professionals"))
        .await
        .unwrap_err();
    match err {
        NicheScoutError::Server { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("boom"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    fallback.assert_async().await;
}

#[tokio::test]
async fn unreachable_server_is_a_connectivity_error() {
    // nothing listens on the discard port
    let client = HttpGenerationClient::new(ApiConfig {
        base_url: "http://127.0.0.1:9".into(),
        timeout_ms: 2_000,
        ..Default::default()
    })
    .unwrap();
    let orch = RequestOrchestrator::new(client, FailureClassifier::new(Vec::new()));

    let err = orch
        .submit(&QueryParams::new("coffee shops", "young professionals"))
        .await
        .unwrap_err();
    assert!(matches!(err, NicheScoutError::Connectivity { .. }));
}

#[tokio::test]
async fn export_failure_body_is_returned_as_is() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/exportar")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(json!({"error": "No hay datos para exportar"}).to_string())
        .create_async()
        .await;

    let result = serde_json::from_value(generation_body()).unwrap();
    let response = client_for(&server).format_export(&result).await.unwrap();
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("No hay datos para exportar"));
}

#[tokio::test]
async fn null_question_list_is_an_empty_result() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"model_info": "gemini-pro"}).to_string())
        .create_async()
        .await;
    server
        .mock("POST", "/generar_preguntas_gemini")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"preguntas": null, "metadatos": null}).to_string())
        .expect(2)
        .create_async()
        .await;

    let params = QueryParams::new("coffee shops", "young professionals");
    let err = orchestrator_for(&server).submit(&params).await.unwrap_err();
    assert!(matches!(err, NicheScoutError::EmptyResult));

    let mut controller = ScoutController::new(
        orchestrator_for(&server),
        ResultRenderer::new(false),
        ExportConfig::default(),
    );
    assert!(!controller.submit(&params).await);
    assert_eq!(
        controller.view().status.as_deref(),
        Some("No questions could be generated. Try a different niche.")
    );
    assert!(!controller.view().exports_enabled);
    assert!(!controller.orchestrator().session().has_result().await);
}
