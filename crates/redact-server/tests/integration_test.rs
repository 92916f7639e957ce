use axum::{Json, Router, routing::post};
use redact_detect::TextRedactor;
use redact_engine::{SchedulerOptions, TaskScheduler};
use redact_ner::HttpRecognizer;
use redact_server::RedactServer;
use redact_storage::JobStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Stand-in NER service tagging every "Jane Doe" as a PERSON
async fn ner_stub(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
    let text = body["text"].as_str().unwrap_or_default();
    let entities: Vec<_> = text
        .match_indices("Jane Doe")
        .map(|(byte_start, name)| {
            let start = text[..byte_start].chars().count();
            serde_json::json!({
                "label": "PERSON",
                "start": start,
                "end": start + name.chars().count(),
            })
        })
        .collect();
    Json(serde_json::json!({ "entities": entities }))
}

async fn spawn_ner_stub() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/ner", post(ner_stub));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/ner", addr)
}

async fn wait_for_status(client: &reqwest::Client, base: &str, job_id: &str) -> String {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let json: serde_json::Value = client
                .get(format!("{}/status/{}", base, job_id))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            let status = json["status"].as_str().unwrap().to_string();
            if status == "completed" || status == "failed" {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("job did not finish")
}

#[tokio::test]
async fn test_redaction_over_http() {
    let recognizer = HttpRecognizer::new(spawn_ner_stub().await).unwrap();
    let scheduler = Arc::new(
        TaskScheduler::start(
            Arc::new(JobStore::new()),
            Arc::new(TextRedactor::new(Arc::new(recognizer))),
            SchedulerOptions {
                workers: 2,
                queue_capacity: 16,
                processing_delay: Duration::from_millis(20),
            },
        )
        .unwrap(),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let (stop, stopped) = oneshot::channel::<()>();
    let server = Arc::new(RedactServer::new(scheduler.clone(), "Redactor API"));
    let serving = tokio::spawn(server.serve_on(listener, async {
        stopped.await.ok();
    }));

    let client = reqwest::Client::new();
    let text = "Café note: Jane Doe, jane@example.com, 555.123.4567";

    let response = client
        .post(format!("{}/submit", base))
        .json(&serde_json::json!({ "text": text }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 202);
    let submitted: serde_json::Value = response.json().await.unwrap();
    let job_id = submitted["job_id"].as_str().unwrap().to_string();

    assert_eq!(wait_for_status(&client, &base, &job_id).await, "completed");

    let result: serde_json::Value = client
        .get(format!("{}/result/{}", base, job_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(result["job_id"], job_id.as_str());
    assert_eq!(
        result["redacted_text"],
        "Café note: [REDACTED], [REDACTED], [REDACTED]"
    );

    let metadata = result["metadata"].as_array().unwrap();
    let kinds: Vec<_> = metadata.iter().map(|m| m["type"].clone()).collect();
    assert_eq!(kinds, vec!["PERSON", "EMAIL", "PHONE"]);
    assert_eq!(metadata[0]["span"], serde_json::json!([11, 19]));
    assert_eq!(metadata[0]["original_text"], "Jane Doe");
    assert_eq!(metadata[1]["original_text"], "jane@example.com");
    assert_eq!(metadata[2]["original_text"], "555.123.4567");
    assert_eq!(metadata[2]["reason"], "Phone Number");

    stop.send(()).ok();
    serving.await.unwrap().unwrap();
    scheduler.shutdown().await;
}
