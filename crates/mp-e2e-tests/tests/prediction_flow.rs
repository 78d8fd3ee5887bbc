//! E2E tests for the prediction request path: HTTP → orchestrator → agent → parser.

mod helpers;

use axum::http::StatusCode;

use helpers::{TestHarness, sample_answer, sample_result};
use mp_protocol::PredictResponse;

const CONCRETE_ANSWER: &str = "Kontrol baik.
Target_Tonase_Ekstrak: 80
Prediksi_Kontrol: 75.50
Selisih_Kontrol: 4.50
---END_ANALYSIS---
Rekomendasi 1: Tambah Truk
Truk: 14
Ekskavator: 3
Operator: 18
Cuaca: 1
Prediksi: 79.80
Selisih: 0.20
Alasan: Penambahan truk mendekati target.
---START_RECOMMENDATION---
";

/// The documented example answer maps field-for-field onto the response.
#[tokio::test]
async fn e2e_concrete_scenario() {
    let h = TestHarness::scripted([CONCRETE_ANSWER]);

    let (status, json) = h
        .predict(
            "user_api_001",
            "Saya ingin 80 ton. Saat ini pakai 12 Truk, 3 Ekskavator, 18 Operator, cuaca Cloudy.",
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        serde_json::json!({
            "status": "success",
            "target_tonnage": 80,
            "initial_analysis_text": "Kontrol baik.",
            "initial_prediction": 75.5,
            "initial_difference": 4.5,
            "recommendations": [{
                "title": "Tambah Truk",
                "trucks": 14,
                "excavators": 3,
                "operators": 18,
                "weather": 1,
                "predicted_tonnage": 79.8,
                "difference_from_target": 0.2,
                "rationale": "Penambahan truk mendekati target."
            }]
        })
    );
}

/// Rendering a result and sending it through the full stack reproduces it.
#[tokio::test]
async fn e2e_rendered_result_round_trips() {
    let h = TestHarness::scripted([sample_answer()]);

    let (status, json) = h.predict("u1", "80 ton").await;
    assert_eq!(status, StatusCode::OK);

    let response: PredictResponse = serde_json::from_value(json).unwrap();
    assert_eq!(response, PredictResponse::from(sample_result()));
    assert_eq!(
        response,
        PredictResponse::from(mp_parser::parse(&sample_answer()).unwrap())
    );

    let titles: Vec<_> = response.recommendations.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Tambah Truk", "Tambah Ekskavator", "Kontrol"]);
    for rec in &response.recommendations {
        assert_eq!(rec.difference_matches(80.0, 1e-9), Some(true), "{}", rec.title);
    }
}

/// Agent text without the analysis delimiter is a 500 naming the problem.
#[tokio::test]
async fn e2e_missing_delimiter_is_processing_error() {
    let h = TestHarness::scripted([sample_answer().replace("---END_ANALYSIS---", "")]);

    let (status, json) = h.predict("u1", "80 ton").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        json["detail"]
            .as_str()
            .unwrap()
            .contains("missing analysis delimiter")
    );
}

/// A zero target fails validation even with well-formed recommendations.
#[tokio::test]
async fn e2e_zero_target_is_incomplete_analysis() {
    let mut result = sample_result();
    result.target_tonnage = 0;
    let h = TestHarness::scripted([mp_protocol::format::render(&result)]);

    let (status, json) = h.predict("u1", "0 ton").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = json["detail"].as_str().unwrap();
    assert!(detail.contains("incomplete analysis"), "{detail}");
    assert!(detail.contains("Target_Tonase_Ekstrak"), "{detail}");
}

/// A block without `Alasan` still parses, with the fallback rationale.
#[tokio::test]
async fn e2e_missing_rationale_uses_fallback() {
    let answer = CONCRETE_ANSWER.replace("Alasan: Penambahan truk mendekati target.\n", "");
    let h = TestHarness::scripted([answer]);

    let (status, json) = h.predict("u1", "80 ton").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["recommendations"][0]["rationale"],
        "Alasan tidak tersedia (Gagal parsing)."
    );
    assert_eq!(json["recommendations"][0]["trucks"], 14);
}

/// Malformed numbers are kept as strings; absent fields are omitted.
#[tokio::test]
async fn e2e_sloppy_block_is_kept_permissively() {
    let answer = CONCRETE_ANSWER
        .replace("Truk: 14", "Truk: empat belas")
        .replace("Prediksi: 79.80", "Prediksi: 1,079.80 ton")
        .replace("Ekskavator: 3\n", "")
        .replace("Cuaca: 1", "Cuaca: Sunny");
    let h = TestHarness::scripted([answer]);

    let (status, json) = h.predict("u1", "80 ton").await;
    assert_eq!(status, StatusCode::OK);
    let rec = &json["recommendations"][0];
    assert_eq!(rec["trucks"], "empat belas");
    assert_eq!(rec["predicted_tonnage"], 1079.8);
    assert_eq!(rec["weather"], 2);
    assert!(rec.get("excavators").is_none());
}

/// An agent answer with no final text is a 500.
#[tokio::test]
async fn e2e_silent_agent_is_empty_response() {
    let h = TestHarness::with_scripted_agent(mp_agent::ScriptedAgent::silent());

    let (status, json) = h.predict("u1", "80 ton").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["detail"].as_str().unwrap().contains("no final text"));
}

/// Agent failures surface as a 500 carrying the underlying message.
#[tokio::test]
async fn e2e_agent_failure_is_processing_error() {
    let h = TestHarness::with_scripted_agent(mp_agent::ScriptedAgent::failing(
        "deadline exceeded",
    ));

    let (status, json) = h.predict("u1", "80 ton").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["detail"].as_str().unwrap().contains("deadline exceeded"));
}
