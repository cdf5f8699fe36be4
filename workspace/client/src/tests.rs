use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Multipart, Path, Query};
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use common::{
    AlertDto, AlertPeriod, BudgetPeriod, ChatAttachment, CreateBudgetRequest,
    CreateCategoryRequest, CreateMoneyNoteRequest, FinanceChatRequest, MoneyNoteQuery,
    RecordStatus, TransactionType, UpdateCategoryRequest, UpdateMoneyNoteRequest, UtcRange,
};
use serde_json::{Value, json};

use crate::error::{ApiError, ErrorBody, NETWORK_ERROR_MESSAGE};
use crate::queries::QueryClient;
use crate::test_utils::{
    category_json, client_for, closed_port_url, envelope, money_note_json, spawn_stub,
};

const MARCH_15: UtcRange = UtcRange {
    start: 1_741_996_800,
    end: 1_742_083_199,
};

fn header_str(headers: &HeaderMap, name: axum::http::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[tokio::test]
async fn test_list_money_notes_sends_epoch_window() {
    let router = Router::new().route(
        "/api/v1/money-note",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            let expected = params.get("start_date").map(String::as_str) == Some("1741996800")
                && params.get("end_date").map(String::as_str) == Some("1742083199")
                && params.get("status").map(String::as_str) == Some("2");
            if expected {
                (
                    StatusCode::OK,
                    Json(envelope(json!([money_note_json(1, 3, 45000), money_note_json(2, 3, 5000)]))),
                )
            } else {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "message": format!("unexpected params: {:?}", params) })),
                )
            }
        }),
    );
    let client = client_for(&spawn_stub(router).await);

    let notes = client
        .list_money_notes(&MoneyNoteQuery::active(MARCH_15))
        .await
        .expect("Failed to list money notes");

    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].amount, 45_000);
    assert_eq!(notes[0].kind, TransactionType::Expense);
}

#[tokio::test]
async fn test_json_requests_carry_default_headers() {
    let router = Router::new().route(
        "/api/v1/category",
        get(|headers: HeaderMap| async move {
            let accept = header_str(&headers, ACCEPT);
            let content_type = header_str(&headers, CONTENT_TYPE);
            if accept.as_deref() == Some("application/json")
                && content_type.as_deref() == Some("application/json")
            {
                (StatusCode::OK, Json(envelope(json!([category_json(1, "Food")]))))
            } else {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": "missing JSON headers" })))
            }
        }),
    );
    let client = client_for(&spawn_stub(router).await);

    let categories = client.list_active_categories().await.expect("Failed to list categories");
    assert_eq!(categories[0].name, "Food");
}

#[tokio::test]
async fn test_error_body_shapes_are_normalized() {
    let router = Router::new()
        .route(
            "/api/v1/category",
            post(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({ "detail": { "message": "Category already exists" } })),
                )
            }),
        )
        .route(
            "/api/v1/category/:id",
            put(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "success": false, "message": "Name too long" })),
                )
            }),
        )
        .route(
            "/api/v1/budget",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable") }).post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({
                        "detail": [{ "loc": ["body", "amount"], "msg": "field required", "type": "value_error.missing" }]
                    })),
                )
            }),
        )
        .route(
            "/api/v1/budget/:id",
            delete(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route(
            "/api/v1/money-note/:id",
            put(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "boom", "code": "E1" })),
                )
            }),
        );
    let client = client_for(&spawn_stub(router).await);

    let create = CreateCategoryRequest {
        kind: TransactionType::Expense,
        name: "Food".to_string(),
    };
    let err = client.create_category(&create).await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.user_message(), "Category already exists");

    let update = UpdateCategoryRequest {
        kind: TransactionType::Expense,
        name: "A very long category name".to_string(),
        status: None,
    };
    let err = client.update_category(1, &update).await.unwrap_err();
    assert_eq!(err.user_message(), "Name too long");

    let err = client.list_budgets().await.unwrap_err();
    assert!(matches!(
        &err,
        ApiError::Server { status: 503, body: ErrorBody::Text(text) } if text == "Service Unavailable"
    ));
    assert_eq!(err.user_message(), "Service Unavailable");

    let err = client.delete_budget(7).await.unwrap_err();
    assert_eq!(err.user_message(), "Request failed: 500");

    let budget = CreateBudgetRequest {
        category_id: 3,
        amount: 0,
        period_type: BudgetPeriod::Monthly,
        start_date: "2025-03-01".to_string(),
        end_date: "2025-03-31".to_string(),
    };
    let err = client.create_budget(&budget).await.unwrap_err();
    assert!(matches!(
        &err,
        ApiError::Server { status: 422, body: ErrorBody::Unrecognized }
    ));
    assert_eq!(err.user_message(), "Request failed: 422");

    let note = UpdateMoneyNoteRequest {
        note: "Lunch".to_string(),
        amount: 50_000,
        category_id: 3,
        status: None,
    };
    let err = client.update_money_note(9, &note).await.unwrap_err();
    assert_eq!(err.user_message(), "Request failed: 400");
}

#[tokio::test]
async fn test_network_failure_uses_fixed_message() {
    let client = client_for(&closed_port_url().await);

    let err = client.list_active_categories().await.unwrap_err();
    assert!(err.is_network(), "expected network error, got {:?}", err);
    assert_eq!(err.user_message(), NETWORK_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_malformed_timestamp_fails_decoding() {
    let router = Router::new().route(
        "/api/v1/money-note",
        get(|| async {
            let mut note = money_note_json(1, 3, 1000);
            note["date"] = json!("not a date");
            Json(envelope(json!([note])))
        }),
    );
    let client = client_for(&spawn_stub(router).await);

    let err = client
        .list_money_notes(&MoneyNoteQuery::new(MARCH_15))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_money_notes_are_created_as_an_array() {
    let router = Router::new().route(
        "/api/v1/money-note",
        post(|Json(body): Json<Value>| async move {
            let valid = body.as_array().is_some_and(|notes| notes.len() == 2)
                && body[0]["type"] == 1
                && body[1]["category_id"] == 4;
            if valid {
                (StatusCode::CREATED, Json(envelope(json!([]))))
            } else {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": "bad body" })))
            }
        }),
    );
    let client = client_for(&spawn_stub(router).await);

    let notes = vec![
        CreateMoneyNoteRequest {
            kind: TransactionType::Expense,
            note: "Lunch".to_string(),
            amount: 65_000,
            category_id: 3,
        },
        CreateMoneyNoteRequest {
            kind: TransactionType::Expense,
            note: "Taxi".to_string(),
            amount: 120_000,
            category_id: 4,
        },
    ];
    client
        .create_money_notes(&notes)
        .await
        .expect("Failed to create money notes");
}

#[tokio::test]
async fn test_alert_update_uses_post_on_item_path() {
    let router = Router::new().route(
        "/api/v1/alert/:id",
        post(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
            if id == 4 && body["status"] == 1 && body["amount"] == 2_000_000 {
                StatusCode::OK
            } else {
                StatusCode::BAD_REQUEST
            }
        }),
    );
    let client = client_for(&spawn_stub(router).await);

    let alert = AlertDto {
        id: 4,
        title: "Food".to_string(),
        start_date: MARCH_15.start,
        end_date: MARCH_15.end,
        threshold: 2_000_000,
        period: AlertPeriod::Daily,
        category_id: 3,
        status: RecordStatus::Active,
        created_at: 0,
        updated_at: 0,
    };
    client
        .deactivate_alert(&alert)
        .await
        .expect("Failed to deactivate alert");
}

#[tokio::test]
async fn test_delete_without_body_succeeds() {
    let router = Router::new().route(
        "/api/v1/money-note/:id",
        delete(|| async { StatusCode::NO_CONTENT }),
    );
    let client = client_for(&spawn_stub(router).await);

    client
        .delete_money_note(12)
        .await
        .expect("Failed to delete money note");
}

#[tokio::test]
async fn test_finance_chat_is_multipart_without_json_headers() {
    let router = Router::new().route(
        "/api/v3/finance-ai/chat",
        post(|headers: HeaderMap, mut multipart: Multipart| async move {
            let mut fields = Vec::new();
            while let Ok(Some(field)) = multipart.next_field().await {
                let name = field.name().unwrap_or_default().to_string();
                let file_name = field.file_name().map(str::to_string);
                let size = field.bytes().await.map(|bytes| bytes.len()).unwrap_or(0);
                fields.push(json!({ "name": name, "file_name": file_name, "size": size }));
            }
            Json(json!({
                "content_type": header_str(&headers, CONTENT_TYPE),
                "accept": header_str(&headers, ACCEPT),
                "fields": fields,
            }))
        }),
    );
    let client = client_for(&spawn_stub(router).await);

    let request = FinanceChatRequest {
        chat: "Lunch 65k".to_string(),
        file: Some(ChatAttachment {
            file_name: "receipt.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![0x89, 0x50, 0x4E, 0x47],
        }),
        model: Some("gpt-4o-mini".to_string()),
        temperature: Some(0.2),
    };
    let reply = client.finance_chat(&request).await.expect("Chat request failed");

    let content_type = reply["content_type"].as_str().unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"), "got {}", content_type);
    assert_ne!(reply["accept"], "application/json");

    let names: Vec<&str> = reply["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|field| field["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["chat", "file", "model", "temperature"]);
    assert_eq!(reply["fields"][1]["file_name"], "receipt.png");
    assert_eq!(reply["fields"][1]["size"], 4);
}

#[tokio::test]
async fn test_mutations_invalidate_only_their_resource() {
    let category_hits = Arc::new(AtomicUsize::new(0));
    let note_hits = Arc::new(AtomicUsize::new(0));

    let router = {
        let category_hits = category_hits.clone();
        let note_hits = note_hits.clone();
        Router::new()
            .route(
                "/api/v1/category",
                get(move || {
                    let hits = category_hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        Json(envelope(json!([category_json(1, "Food")])))
                    }
                })
                .post(|| async { (StatusCode::CREATED, Json(envelope(json!(null)))) }),
            )
            .route(
                "/api/v1/money-note",
                get(move || {
                    let hits = note_hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        Json(envelope(json!([money_note_json(1, 1, 1000)])))
                    }
                }),
            )
    };
    let queries = QueryClient::new(client_for(&spawn_stub(router).await));
    let notes_query = MoneyNoteQuery::new(MARCH_15);

    queries.active_categories().await.unwrap();
    queries.active_categories().await.unwrap();
    queries.money_notes(&notes_query).await.unwrap();
    assert_eq!(category_hits.load(Ordering::SeqCst), 1);
    assert_eq!(note_hits.load(Ordering::SeqCst), 1);

    let create = CreateCategoryRequest {
        kind: TransactionType::Expense,
        name: "Transport".to_string(),
    };
    queries.create_category(&create).await.unwrap();

    queries.active_categories().await.unwrap();
    queries.money_notes(&notes_query).await.unwrap();
    assert_eq!(category_hits.load(Ordering::SeqCst), 2);
    assert_eq!(note_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_reads_are_not_cached() {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = {
        let hits = hits.clone();
        Router::new().route(
            "/api/v1/budget",
            get(move || {
                let hits = hits.clone();
                async move {
                    if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                        (StatusCode::BAD_GATEWAY, Json(json!({ "message": "Upstream down" })))
                    } else {
                        (StatusCode::OK, Json(envelope(json!([]))))
                    }
                }
            }),
        )
    };
    let queries = QueryClient::new(client_for(&spawn_stub(router).await));

    let err = queries.budgets().await.unwrap_err();
    assert_eq!(err.user_message(), "Upstream down");

    let budgets = queries.budgets().await.expect("Second read should refetch");
    assert!(budgets.is_empty());
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}
