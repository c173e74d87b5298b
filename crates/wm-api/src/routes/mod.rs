//! API routes

pub mod collections;
pub mod dashboard;
pub mod sites;

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use crate::config::AppConfig;
    use crate::{app, AppState};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use wm_core::{MemoryStore, SiteCatalog};

    fn router() -> Router {
        let catalog = Arc::new(SiteCatalog::builtin().unwrap());
        app(Arc::new(AppState {
            store: Arc::new(MemoryStore::new(catalog.clone())),
            catalog,
            config: AppConfig::default(),
        }))
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn collection(site: &str, waste_type: &str, date: &str, volume: &str) -> Value {
        json!({
            "siteName": site,
            "wasteType": waste_type,
            "collectionDate": date,
            "totalVolume": volume,
            "wasteSeparated": false,
            "collectionCount": 1,
            "latitude": 0.25509,
            "longitude": 34.72066
        })
    }

    async fn seeded() -> Router {
        let router = router();
        for body in [
            collection("Rosterman Dumpsite", "Organic", "2025-10-20", "10.5"),
            collection("Shirere Waste Collection", "Mixed", "2025-10-20", "7.5"),
            collection("Rosterman Dumpsite", "Mixed", "2025-10-21", "18.3"),
        ] {
            let (status, _) = send(&router, Method::POST, "/api/collections", Some(body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }
        router
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&router(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_submit_returns_stored_record() {
        let router = router();
        let body = collection("Rosterman Dumpsite", "Organic", "2025-10-20", "12.5");

        let (status, record) = send(&router, Method::POST, "/api/collections", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(record["id"], 1);
        assert_eq!(record["totalVolume"], "12.5");
        assert_eq!(record["collectionDate"], "2025-10-20T00:00:00Z");
    }

    #[tokio::test]
    async fn test_submit_validation_errors() {
        let router = router();
        let mut body = collection("Rosterman Dumpsite", "Organic", "2025-10-20", "5");
        body["wasteSeparated"] = json!(true);
        body["organicVolume"] = json!("4");
        body["inorganicVolume"] = json!("4");
        body["collectionCount"] = json!(0);

        let (status, error) = send(&router, Method::POST, "/api/collections", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let fields: Vec<_> = error["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["collectionCount", "organicVolume"]);

        let (_, records) = send(&router, Method::GET, "/api/collections", None).await;
        assert_eq!(records, json!([]));
    }

    #[tokio::test]
    async fn test_list_filters_newest_first() {
        let router = seeded().await;

        let (status, records) = send(&router, Method::GET, "/api/collections", None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<_> = records.as_array().unwrap().iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!(3), json!(2), json!(1)]);

        let uri = "/api/collections?siteName=Rosterman%20Dumpsite&wasteType=Mixed";
        let (_, records) = send(&router, Method::GET, uri, None).await;
        assert_eq!(records.as_array().unwrap().len(), 1);

        let uri = "/api/collections?minVolume=8&wasteSeparated=false";
        let (_, records) = send(&router, Method::GET, uri, None).await;
        assert_eq!(records.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_summary_and_trend() {
        let router = seeded().await;

        let (status, body) = send(&router, Method::GET, "/api/summary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["totalRecords"], 3);
        assert_eq!(body["summary"]["totalVolume"], "36.3");
        assert_eq!(body["summary"]["byWasteType"], json!({ "Organic": 1, "Mixed": 2 }));
        assert_eq!(body["trend"], json!({ "2025-10-20": "18.0", "2025-10-21": "18.3" }));
    }

    #[tokio::test]
    async fn test_dashboard_markers() {
        let router = seeded().await;

        let (status, body) = send(&router, Method::GET, "/api/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalRecords"], 3);
        assert_eq!(body["totalVolume"], "36.3");
        assert_eq!(body["markers"].as_array().unwrap().len(), 2);
        assert_eq!(body["markers"][0]["id"], "rosterman-dumpsite");
    }

    #[tokio::test]
    async fn test_sites() {
        let (status, body) = send(&router(), Method::GET, "/api/sites", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 10);
        assert_eq!(body[0]["kind"], "informal");
    }
}
