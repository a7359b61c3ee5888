//! API integration tests against a running server
//!
//! Start the server with a migrated database, then run
//! `cargo test --test api_tests -- --ignored`.

use agriflow_marketplace::models::{Role, UserClaims};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "change-this-secret-in-production".to_string())
}

/// Mint a token the way the platform's identity service would
fn token_for(user_id: i32, role: Role) -> String {
    UserClaims::new(user_id, format!("user{}", user_id), role, 1)
        .create_token(&jwt_secret())
        .expect("Failed to sign token")
}

async fn send(client: &Client, method: reqwest::Method, path: &str, token: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = client
        .request(method, format!("{}{}", BASE_URL, path))
        .bearer_auth(token);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.send().await.expect("Failed to send request");
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn create_rental_listing(client: &Client, owner: &str) -> i64 {
    let (status, body) = send(
        client,
        reqwest::Method::POST,
        "/listings",
        owner,
        Some(json!({
            "title": "Tracteur Massey Ferguson 165",
            "description": "Tracteur 60 CV, entretien récent",
            "price": "120.00",
            "listing_type": "RENTAL",
            "category": "TRACTOR",
            "location": "Béja",
            "availability_start": "2030-06-01",
            "availability_end": "2030-06-30"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "AVAILABLE");
    body["id"].as_i64().expect("No id in response")
}

async fn reserve(client: &Client, listing_id: i64, token: &str, start: &str, end: &str) -> (StatusCode, Value) {
    send(
        client,
        reqwest::Method::POST,
        &format!("/listings/{}/reservations", listing_id),
        token,
        Some(json!({"start_date": start, "end_date": end})),
    )
    .await
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_and_ready() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_rental_lifecycle() {
    let client = Client::new();
    let owner = token_for(1001, Role::Farmer);
    let renter = token_for(1002, Role::Farmer);
    let latecomer = token_for(1003, Role::Farmer);

    let listing_id = create_rental_listing(&client, &owner).await;

    let (status, quote) = send(
        &client,
        reqwest::Method::GET,
        &format!("/listings/{}/quote?start_date=2030-06-02&end_date=2030-06-05", listing_id),
        &renter,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["days"], 3);

    let (status, _) = send(
        &client,
        reqwest::Method::POST,
        &format!("/listings/{}/reservations", listing_id),
        &owner,
        Some(json!({"start_date": "2030-06-02", "end_date": "2030-06-05"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "owner cannot reserve own listing");

    let (status, reservation) = send(
        &client,
        reqwest::Method::POST,
        &format!("/listings/{}/reservations", listing_id),
        &renter,
        Some(json!({"start_date": "2030-06-02", "end_date": "2030-06-05", "comment": "Pour les labours"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reservation["status"], "PENDING");
    let reservation_id = reservation["id"].as_i64().expect("No id");

    let (status, _) = send(
        &client,
        reqwest::Method::POST,
        &format!("/listings/{}/reservations", listing_id),
        &latecomer,
        Some(json!({"start_date": "2030-06-10", "end_date": "2030-06-12"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &client,
        reqwest::Method::POST,
        &format!("/reservations/{}/confirm", reservation_id),
        &renter,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "only the owner confirms");

    let (status, confirmed) = send(
        &client,
        reqwest::Method::POST,
        &format!("/reservations/{}/confirm", reservation_id),
        &owner,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "CONFIRMED");

    let (_, listing) = send(&client, reqwest::Method::GET, &format!("/listings/{}", listing_id), &renter, None).await;
    assert_eq!(listing["status"], "RENTED");

    let (status, _) = send(&client, reqwest::Method::DELETE, &format!("/listings/{}", listing_id), &owner, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "rented listing cannot be deleted");

    let (status, completed) = send(
        &client,
        reqwest::Method::POST,
        &format!("/reservations/{}/complete", reservation_id),
        &owner,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["status"], "COMPLETED");

    let (_, listing) = send(&client, reqwest::Method::GET, &format!("/listings/{}", listing_id), &renter, None).await;
    assert_eq!(listing["status"], "AVAILABLE");

    let (status, _) = send(&client, reqwest::Method::DELETE, &format!("/listings/{}", listing_id), &owner, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore]
async fn test_confirmed_sale_cannot_be_cancelled() {
    let client = Client::new();
    let seller = token_for(2001, Role::Farmer);
    let buyer = token_for(2002, Role::Farmer);

    let (status, listing) = send(
        &client,
        reqwest::Method::POST,
        "/listings",
        &seller,
        Some(json!({
            "title": "Blé dur 2 tonnes",
            "description": "Récolte de juillet",
            "price": "1800",
            "listing_type": "SALE",
            "category": "HARVEST",
            "location": "Jendouba",
            "availability_start": "2030-01-01",
            "availability_end": "2030-12-31"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(listing["availability_start"].is_null());
    let listing_id = listing["id"].as_i64().expect("No id");

    let (status, reservation) = send(
        &client,
        reqwest::Method::POST,
        &format!("/listings/{}/reservations", listing_id),
        &buyer,
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reservation["total_price"], "1800.00");
    let reservation_id = reservation["id"].as_i64().expect("No id");

    send(&client, reqwest::Method::POST, &format!("/reservations/{}/confirm", reservation_id), &seller, None).await;

    let (_, listing) = send(&client, reqwest::Method::GET, &format!("/listings/{}", listing_id), &buyer, None).await;
    assert_eq!(listing["status"], "SOLD");

    let (status, _) = send(
        &client,
        reqwest::Method::POST,
        &format!("/reservations/{}/cancel", reservation_id),
        &buyer,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&client, reqwest::Method::DELETE, &format!("/listings/{}", listing_id), &seller, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "sold listing keeps its sale record");
}

#[tokio::test]
#[ignore]
async fn test_cancelled_reservations_release_listing() {
    let client = Client::new();
    let owner = token_for(4001, Role::Farmer);
    let renter = token_for(4002, Role::Farmer);
    let other = token_for(4003, Role::Farmer);

    let listing_id = create_rental_listing(&client, &owner).await;
    let (status, pending) = reserve(&client, listing_id, &renter, "2030-06-03", "2030-06-04").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, cancelled) = send(
        &client,
        reqwest::Method::POST,
        &format!("/reservations/{}/cancel", pending["id"]),
        &renter,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "CANCELLED");
    let (_, listing) = send(&client, reqwest::Method::GET, &format!("/listings/{}", listing_id), &owner, None).await;
    assert_eq!(listing["status"], "AVAILABLE");

    let (status, second) = reserve(&client, listing_id, &other, "2030-06-10", "2030-06-15").await;
    assert_eq!(status, StatusCode::CREATED, "listing can be reserved again");
    send(&client, reqwest::Method::POST, &format!("/reservations/{}/confirm", second["id"]), &owner, None).await;
    let (_, listing) = send(&client, reqwest::Method::GET, &format!("/listings/{}", listing_id), &owner, None).await;
    assert_eq!(listing["status"], "RENTED");

    let (status, _) = send(
        &client,
        reqwest::Method::POST,
        &format!("/reservations/{}/cancel", second["id"]),
        &owner,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, listing) = send(&client, reqwest::Method::GET, &format!("/listings/{}", listing_id), &owner, None).await;
    assert_eq!(listing["status"], "AVAILABLE");

    let (status, _) = reserve(&client, listing_id, &renter, "2030-06-20", "2030-06-22").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
#[ignore]
async fn test_cancelled_contract_releases_equipment() {
    let client = Client::new();
    let owner = token_for(5001, Role::Farmer);
    let renter = token_for(5002, Role::Farmer);

    let (_, equipment) = send(
        &client,
        reqwest::Method::POST,
        "/equipment",
        &owner,
        Some(json!({"name": "Semoir 4 rangs", "equipment_type": "Semoir", "daily_price": "55"})),
    )
    .await;
    let equipment_id = equipment["id"].as_i64().expect("No id");
    let contract_body = json!({"equipment_id": equipment_id, "start_date": "2030-10-01", "end_date": "2030-10-02"});

    let (status, contract) = send(&client, reqwest::Method::POST, "/contracts", &renter, Some(contract_body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&client, reqwest::Method::DELETE, &format!("/equipment/{}", equipment_id), &owner, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "equipment under contract");

    let (status, cancelled) = send(
        &client,
        reqwest::Method::POST,
        &format!("/contracts/{}/cancel", contract["id"]),
        &renter,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "CANCELLED");

    let (_, equipment) = send(&client, reqwest::Method::GET, &format!("/equipment/{}", equipment_id), &renter, None).await;
    assert_eq!(equipment["available"], true);

    let (status, _) = send(&client, reqwest::Method::POST, "/contracts", &renter, Some(contract_body)).await;
    assert_eq!(status, StatusCode::CREATED, "equipment can be rented again");
}

#[tokio::test]
#[ignore]
async fn test_equipment_contract_flow() {
    let client = Client::new();
    let owner = token_for(3001, Role::Farmer);
    let renter = token_for(3002, Role::Farmer);
    let admin = token_for(1, Role::Admin);

    let (status, equipment) = send(
        &client,
        reqwest::Method::POST,
        "/equipment",
        &owner,
        Some(json!({"name": "Pulvérisateur 800L", "equipment_type": "Pulvérisateur", "daily_price": "40"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(equipment["available"], true);
    let equipment_id = equipment["id"].as_i64().expect("No id");

    let (status, contract) = send(
        &client,
        reqwest::Method::POST,
        "/contracts",
        &renter,
        Some(json!({"equipment_id": equipment_id, "start_date": "2030-04-01", "end_date": "2030-04-04"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(contract["status"], "PENDING");
    assert_eq!(contract["total_price"], "120.00");
    let contract_id = contract["id"].as_i64().expect("No id");

    let (_, equipment) = send(&client, reqwest::Method::GET, &format!("/equipment/{}", equipment_id), &renter, None).await;
    assert_eq!(equipment["available"], false);

    let (status, _) = send(
        &client,
        reqwest::Method::PUT,
        &format!("/equipment/{}/availability", equipment_id),
        &owner,
        Some(json!({"available": true})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "equipment under contract");

    let (status, _) = send(&client, reqwest::Method::POST, &format!("/contracts/{}/activate", contract_id), &owner, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, done) = send(&client, reqwest::Method::POST, &format!("/contracts/{}/complete", contract_id), &owner, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "COMPLETED");

    let (_, equipment) = send(&client, reqwest::Method::GET, &format!("/equipment/{}", equipment_id), &renter, None).await;
    assert_eq!(equipment["available"], true);

    let (status, _) = send(&client, reqwest::Method::DELETE, &format!("/contracts/{}", contract_id), &owner, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&client, reqwest::Method::DELETE, &format!("/contracts/{}", contract_id), &admin, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
