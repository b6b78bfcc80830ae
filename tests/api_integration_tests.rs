// API Integration Tests
//
// Drive the router in-process against an in-memory catalog.
// Run with: cargo test --features api --test api_integration_tests

#[cfg(feature = "api")]
mod api_tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use pocket_gardener::catalog::{Catalog, CatalogError, CatalogSource, InMemoryCatalog};
    use pocket_gardener::layout::OverflowPolicy;
    use pocket_gardener::{create_router, AppState, Plant, PlantCategory, SizeBand, Soil, Sun, Water};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt; // for oneshot

    fn plant(id: &str, name: &str, size: SizeBand) -> Plant {
        Plant::new(id, name)
            .with_sun([Sun::FullSun])
            .with_soil([Soil::Clay, Soil::Loam])
            .with_water([Water::DrainsWell])
            .with_sizes([size])
    }

    fn test_catalog() -> Vec<Plant> {
        vec![
            plant("1", "Pittosporum", SizeBand::OneToTwoMetres).with_category(PlantCategory::Shrub),
            plant("2", "Flax", SizeBand::OneToTwoMetres).with_category(PlantCategory::Flax),
            plant("3", "Kowhai", SizeBand::OverFourMetres).with_category(PlantCategory::Tree),
            plant("4", "Flax", SizeBand::OneToTwoMetres),
            plant("5", "coprosma", SizeBand::OneToTwoMetres),
            plant("6", "Thyme", SizeBand::UnderOneMetre),
        ]
    }

    // Helper: Create test app over the in-memory catalog
    fn create_test_app() -> axum::Router {
        let source = Arc::new(InMemoryCatalog::from_plants(test_catalog()));
        create_router(AppState::from_source(source, OverflowPolicy::Cascade))
    }

    struct UnreachableCatalog;

    impl CatalogSource for UnreachableCatalog {
        fn snapshot(&self) -> Result<Arc<Catalog>, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".to_string()))
        }
    }

    // Helper: Parse JSON response
    async fn json_response(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        serde_json::from_slice(&body).expect("Failed to parse JSON")
    }

    async fn get(app: &axum::Router, uri: &str) -> axum::response::Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn send_json(app: &axum::Router, method: &str, uri: &str, body: Value) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn delete(app: &axum::Router, uri: &str) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    // =========================================================================
    // Section 1: Health Check
    // =========================================================================

    #[tokio::test]
    async fn test_health_check() {
        let app = create_test_app();
        let response = get(&app, "/health").await;

        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = json_response(response).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    // =========================================================================
    // Section 2: Matchmaker
    // =========================================================================

    #[tokio::test]
    async fn test_match_ranks_by_name() {
        let app = create_test_app();
        let response = get(
            &app,
            "/api/plants/match?sun=Full%20Sun&soil=Clay&water=Drains%20Well&size=1-2m",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = json_response(response).await;
        assert_eq!(body["rows"], 4);
        let ids: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["5", "2", "4", "1"]);
        assert_eq!(body["conditions"]["size"], "1-2m");
    }

    #[tokio::test]
    async fn test_match_empty_result_is_ok() {
        let app = create_test_app();
        let response = get(
            &app,
            "/api/plants/match?sun=Full%20Shade&soil=Sandy&water=Dry&size=%3C1m",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = json_response(response).await;
        assert_eq!(body["rows"], 0);
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_match_rejects_missing_and_invalid_params() {
        let app = create_test_app();

        let response = get(&app, "/api/plants/match?sun=Full%20Sun&soil=Clay&water=Dry").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = json_response(response).await;
        assert!(body["error"].as_str().unwrap().contains("size"));

        let response = get(
            &app,
            "/api/plants/match?sun=Moonlight&soil=Clay&water=Dry&size=1-2m",
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_catalog_failure_is_retryable_503() {
        let app = create_router(AppState::from_source(
            Arc::new(UnreachableCatalog),
            OverflowPolicy::Cascade,
        ));

        let response = get(
            &app,
            "/api/plants/match?sun=Full%20Sun&soil=Clay&water=Drains%20Well&size=1-2m",
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = json_response(response).await;
        assert_eq!(body["retryable"], true);
        assert!(body["error"].as_str().unwrap().contains("connection refused"));

        let response = get(&app, "/api/plants/library").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    // =========================================================================
    // Section 3: Plants and library
    // =========================================================================

    #[tokio::test]
    async fn test_get_plant_and_not_found() {
        let app = create_test_app();

        let response = get(&app, "/api/plants/3").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = json_response(response).await;
        assert_eq!(body["common_name"], "Kowhai");
        assert_eq!(body["category"], "Tree");
        assert_eq!(body["mature_size"][0], "4m+");

        let response = get(&app, "/api/plants/999").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_library_deduplicates_by_name() {
        let app = create_test_app();
        let response = get(&app, "/api/plants/library").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = json_response(response).await;
        let groups = body["data"].as_array().unwrap();
        let letters: Vec<&str> = groups.iter().map(|g| g["letter"].as_str().unwrap()).collect();
        assert_eq!(letters, vec!["C", "F", "K", "P", "T"]);

        let flax = &groups[1]["plants"];
        assert_eq!(flax.as_array().unwrap().len(), 1);
        assert_eq!(flax[0]["id"], "2");
    }

    // =========================================================================
    // Section 4: Garden builder zones
    // =========================================================================

    #[tokio::test]
    async fn test_zone_listing_defaults() {
        let app = create_test_app();
        let response = get(&app, "/api/zones").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = json_response(response).await;
        assert_eq!(body["policy"], "cascade");
        let zones = body["data"].as_array().unwrap();
        assert_eq!(zones.len(), 4);
        assert_eq!(zones[0]["conditions"]["soil"], "Loam");
        assert_eq!(zones[2]["conditions"]["sun"], "Part Shade");
        assert_eq!(zones[3]["status"]["state"], "empty");

        let response = get(&app, "/api/zones/9").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_zone_add_overflow_and_reset() {
        let app = create_test_app();

        // 7 back-row plants: the 7th lands in the middle row
        for _ in 0..7 {
            let response = send_json(&app, "POST", "/api/zones/1/plants", serde_json::json!({ "plant_id": "3" })).await;
            assert_eq!(response.status(), StatusCode::OK);
        }
        let response = get(&app, "/api/zones/1").await;
        let body: Value = json_response(response).await;
        assert_eq!(body["placed"], 7);
        let placements = body["layout"]["placements"].as_array().unwrap();
        assert_eq!(placements[5]["outcome"]["row"], "back");
        assert_eq!(placements[6]["outcome"]["row"], "middle");
        assert_eq!(placements[6]["outcome"]["grid_index"], 6);
        assert_eq!(body["layout"]["grid"][6]["plant_id"], "3");

        // fill to capacity, then one more is a no-op
        for _ in 7..18 {
            send_json(&app, "POST", "/api/zones/1/plants", serde_json::json!({ "plant_id": "6" })).await;
        }
        let response = send_json(&app, "POST", "/api/zones/1/plants", serde_json::json!({ "plant_id": "6" })).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = json_response(response).await;
        assert_eq!(body["added"], false);
        assert_eq!(body["zone"]["placed"], 18);
        assert_eq!(body["zone"]["status"]["state"], "full");

        let response = delete(&app, "/api/zones/1").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = json_response(response).await;
        assert_eq!(body["status"]["state"], "empty");
    }

    #[tokio::test]
    async fn test_zone_remove_plant_instance() {
        let app = create_test_app();
        let response = send_json(&app, "POST", "/api/zones/2/plants", serde_json::json!({ "plant_id": "6" })).await;
        let body: Value = json_response(response).await;
        let instance_id = body["instance_id"].as_u64().unwrap();

        let response = delete(&app, &format!("/api/zones/2/plants/{}", instance_id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = json_response(response).await;
        assert_eq!(body["removed"], "6");
        assert_eq!(body["zone"]["placed"], 0);

        let response = delete(&app, &format!("/api/zones/2/plants/{}", instance_id)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send_json(&app, "POST", "/api/zones/2/plants", serde_json::json!({ "plant_id": "nope" })).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_zone_conditions_drive_zone_library() {
        let app = create_test_app();

        // zone 3 starts shaded: nothing in the test catalog fits
        let response = get(&app, "/api/zones/3/library").await;
        let body: Value = json_response(response).await;
        assert_eq!(body["rows"], 0);

        let response = send_json(
            &app,
            "PUT",
            "/api/zones/3/conditions",
            serde_json::json!({ "sun": "Full Sun", "soil": "Clay", "water": "Drains Well" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = get(&app, "/api/zones/3/library").await;
        let body: Value = json_response(response).await;
        let names: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["common_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Thyme", "coprosma", "Flax", "Flax", "Pittosporum", "Kowhai"]);
    }

    // =========================================================================
    // Section 5: My garden
    // =========================================================================

    #[tokio::test]
    async fn test_garden_list_lifecycle() {
        let app = create_test_app();

        let response = send_json(&app, "POST", "/api/garden", serde_json::json!({ "plant_id": "3" })).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = send_json(&app, "POST", "/api/garden", serde_json::json!({ "plant_id": "3" })).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send_json(
            &app,
            "POST",
            "/api/garden",
            serde_json::json!({ "plant_id": "6", "project": true }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = json_response(response).await;
        assert_eq!(body["kind"], "project");

        let body: Value = json_response(get(&app, "/api/garden").await).await;
        assert_eq!(body["owned"].as_array().unwrap().len(), 1);
        assert_eq!(body["projects"][0]["common_name"], "Thyme");

        let response = send_json(&app, "POST", "/api/garden/6/promote", serde_json::json!({})).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = json_response(get(&app, "/api/garden").await).await;
        let owned: Vec<&str> = body["owned"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["common_name"].as_str().unwrap())
            .collect();
        assert_eq!(owned, vec!["Kowhai", "Thyme"]);

        let response = delete(&app, "/api/garden/3").await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = delete(&app, "/api/garden/3").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
