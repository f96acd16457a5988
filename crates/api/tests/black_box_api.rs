use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{Value, json};

use launchdesk_api::app::{AppServices, StorefrontOrigin, build_router};
use launchdesk_auth::{Hs256SessionValidator, SessionClaims};
use launchdesk_comments::CustomerProfile;
use launchdesk_core::ProductGid;
use launchdesk_infra::gateway::{GatewayOperation, InMemoryCatalog};
use launchdesk_infra::{
    BestsellerPositionsFile, CatalogGateway, CommentStore, GatewayError, InMemoryCommentStore,
    UserError,
};
use launchdesk_products::CatalogProduct;

const SHOP: &str = "smitten.myshopify.com";
const API_KEY: &str = "launchdesk-key";
const API_SECRET: &str = "launchdesk-secret";
const STOREFRONT: &str = "https://smittencosmetics.com.au";

struct TestServer {
    base_url: String,
    catalog: Arc<InMemoryCatalog>,
    handle: tokio::task::JoinHandle<()>,
    _positions_dir: tempfile::TempDir,
}

impl TestServer {
    async fn spawn(products: Vec<CatalogProduct>) -> Self {
        let catalog = Arc::new(InMemoryCatalog::with_products(products));
        let positions_dir = tempfile::tempdir().expect("failed to create temp dir");

        let gateway: Arc<dyn CatalogGateway> = catalog.clone();
        let comments: Arc<dyn CommentStore> = Arc::new(InMemoryCommentStore::new());
        let services = AppServices::new(
            gateway,
            comments,
            BestsellerPositionsFile::new(positions_dir.path().join("positions.json")),
        );
        let sessions = Arc::new(Hs256SessionValidator::new(
            API_SECRET.as_bytes(),
            API_KEY,
            SHOP,
        ));

        // Same router as prod, but with in-memory services on an ephemeral port.
        let app = build_router(
            services,
            sessions,
            StorefrontOrigin::parse(STOREFRONT).unwrap(),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            catalog,
            handle,
            _positions_dir: positions_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_session(secret: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = SessionClaims {
        iss: format!("https://{SHOP}/admin"),
        dest: format!("https://{SHOP}"),
        aud: API_KEY.to_string(),
        sub: Some("1001".to_string()),
        exp: now + 60,
        nbf: now - 1,
        iat: now - 1,
        jti: None,
        sid: Some("session-1".to_string()),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode session token")
}

fn client() -> reqwest::Client {
    // Redirects are asserted, not followed.
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn product(id: &str, title: &str, tags: &[&str], metafields: &[(&str, &str)]) -> CatalogProduct {
    CatalogProduct {
        id: ProductGid::new(id).unwrap(),
        title: title.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        total_inventory: Some(40),
        featured_image: None,
        metafields: metafields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
    }
}

#[tokio::test]
async fn health_is_public_and_admin_routes_require_session() {
    let server = TestServer::spawn(vec![]).await;
    let client = client();

    let res = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(server.url("/launch-manager")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(server.url("/comments"))
        .bearer_auth(mint_session("wrong-secret"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(server.url("/whoami"))
        .bearer_auth(mint_session(API_SECRET))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["shop"], SHOP);
    assert_eq!(body["user_id"], "1001");
}

#[tokio::test]
async fn launch_board_groups_products_by_state() {
    let server = TestServer::spawn(vec![
        product("P1", "rose  lip oil", &["pre-order"], &[("estimated_ship_date", "Late June")]),
        product("P2", "cloud blush", &["coming-soon"], &[]),
        product("P3", "brow gel", &[], &[]),
    ])
    .await;
    let token = mint_session(API_SECRET);

    let res = client()
        .get(server.url("/launch-manager"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();

    let keys: Vec<&str> = body["groups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["pre-order", "coming-soon", "other"]);

    let card = &body["groups"][0]["products"][0];
    assert_eq!(card["title"], "Rose Lip Oil");
    assert_eq!(card["date_field"]["key"], "estimated_ship_date");
    assert_eq!(card["date_field"]["value"], "Late June");
    assert_eq!(card["actions"][0]["action_type"], "set-now-shipping");

    let res = client()
        .get(server.url("/launch-manager?search=BLUSH"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["groups"].as_array().unwrap().len(), 1);
    assert_eq!(body["groups"][0]["key"], "coming-soon");
}

#[tokio::test]
async fn pre_order_transition_rewrites_tags() {
    let server = TestServer::spawn(vec![product("P1", "Lip Oil", &["coming-soon"], &[])]).await;

    let res = client()
        .post(server.url("/launch-manager"))
        .bearer_auth(mint_session(API_SECRET))
        .form(&[("productId", "P1"), ("actionType", "set-pre-order")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let product = server.catalog.product(&ProductGid::new("P1").unwrap()).unwrap();
    assert_eq!(product.tags, vec!["pre-order"]);
}

#[tokio::test]
async fn rejected_submissions_make_no_catalog_calls() {
    let server = TestServer::spawn(vec![product("P1", "Lip Oil", &["pre-order"], &[])]).await;
    let token = mint_session(API_SECRET);

    let res = client()
        .post(server.url("/launch-manager"))
        .bearer_auth(&token)
        .form(&[("productId", "P1"), ("dateValue", ""), ("isPreOrder", "true")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(
        body["message"],
        "Cannot clear date here. Use the Shopify product admin to remove it."
    );

    let res = client()
        .post(server.url("/launch-manager"))
        .bearer_auth(&token)
        .form(&[("productId", "P1")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Missing productId or action type/date");

    let res = client()
        .post(server.url("/launch-manager"))
        .bearer_auth(&token)
        .form(&[("productId", "P1"), ("actionType", "set-sold-out")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert!(server.catalog.calls().is_empty());
}

#[tokio::test]
async fn failed_date_write_reports_committed_tags() {
    let server = TestServer::spawn(vec![product("P1", "Lip Oil", &["coming-soon"], &[])]).await;
    server.catalog.fail_next(
        GatewayOperation::SetMetafield,
        GatewayError::UserErrors(vec![UserError {
            field: Some(vec!["metafields".to_string()]),
            message: "Owner is locked".to_string(),
        }]),
    );

    let res = client()
        .post(server.url("/launch-manager"))
        .bearer_auth(mint_session(API_SECRET))
        .form(&[
            ("productId", "P1"),
            ("actionType", "set-pre-order"),
            ("dateValue", "2025-08-01"),
            ("isPreOrder", "true"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "date_write_error");
    assert_eq!(body["tags_committed"], true);
    assert_eq!(body["user_errors"][0]["message"], "Owner is locked");

    let product = server.catalog.product(&ProductGid::new("P1").unwrap()).unwrap();
    assert_eq!(product.tags, vec!["pre-order"]);
}

#[tokio::test]
async fn blank_date_after_action_keeps_new_tags() {
    let server = TestServer::spawn(vec![product("P1", "Lip Oil", &["coming-soon"], &[])]).await;

    let res = client()
        .post(server.url("/launch-manager"))
        .bearer_auth(mint_session(API_SECRET))
        .form(&[
            ("productId", "P1"),
            ("actionType", "set-pre-order"),
            ("dateValue", ""),
            ("isPreOrder", "false"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(
        body["message"],
        "Cannot clear date here. Use the Shopify product admin to remove it."
    );

    let product = server.catalog.product(&ProductGid::new("P1").unwrap()).unwrap();
    assert_eq!(product.tags, vec!["pre-order"]);
    assert!(
        !server
            .catalog
            .calls()
            .iter()
            .any(|c| c.operation() == GatewayOperation::SetMetafield)
    );
}

#[tokio::test]
async fn storefront_comments_flow_to_admin_review() {
    let server = TestServer::spawn(vec![product(
        "gid://shopify/Product/4410",
        "Velvet Lipstick",
        &["pre-order"],
        &[],
    )])
    .await;
    server.catalog.add_customer(CustomerProfile {
        first_name: Some("Mia".to_string()),
        last_name: Some("Chen".to_string()),
        email: "mia@example.com".to_string(),
    });
    let client = client();
    let token = mint_session(API_SECRET);

    let res = client
        .request(reqwest::Method::OPTIONS, server.url("/apps/product-manager/comment"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(res.headers()["access-control-allow-origin"], STOREFRONT);

    let res = client
        .post(server.url("/apps/product-manager/comment"))
        .form(&[("productId", "4410"), ("email", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.headers()["access-control-allow-origin"], STOREFRONT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Missing required fields");

    let res = client
        .post(server.url("/apps/product-manager/comment"))
        .form(&[
            ("productId", "4410"),
            ("email", "Mia@Example.com"),
            ("text", "Is the red shade coming back?"),
            ("customerId", "77"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], STOREFRONT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));

    let res = client
        .get(server.url("/comments"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let comment = &body["comments"][0];
    assert_eq!(comment["product_title"], "Velvet Lipstick");
    assert_eq!(comment["name"], "Mia Chen");
    assert_eq!(comment["email"], "mia@example.com");
    let id = comment["id"].as_str().unwrap().to_string();

    let res = client
        .post(server.url("/comments"))
        .bearer_auth(&token)
        .form(&[("commentId", id.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/comments");

    let res = client
        .get(server.url("/comments"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert!(body["comments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn best_sellers_rank_tracked_products_and_store_positions() {
    let server = TestServer::spawn(vec![
        product("P1", "Balm", &["track-bestsellers"], &[("bestseller_score", "12")]),
        product("P2", "Mascara", &["track-bestsellers"], &[("bestseller_score", "40.5")]),
        product("P3", "Primer", &["track-bestsellers"], &[("bestseller_score", "n/a")]),
        product("P4", "Untracked", &[], &[("bestseller_score", "99")]),
    ])
    .await;
    let client = client();
    let token = mint_session(API_SECRET);

    let res = client
        .get(server.url("/best-sellers"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let products = body["products"].as_array().unwrap();
    let ids: Vec<&str> = products.iter().map(|p| p["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["P2", "P1", "P3"]);
    assert_eq!(products[0]["medal"], "gold");
    assert_eq!(products[2]["score"], 0.0);

    let res = client
        .get(server.url("/best-sellers/positions"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!([]));

    let positions = json!([{ "productId": "P2", "position": 1 }, { "productId": "P1", "position": 2 }]);
    let res = client
        .put(server.url("/best-sellers/positions"))
        .bearer_auth(&token)
        .json(&positions)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(server.url("/best-sellers/positions"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.json::<Value>().await.unwrap(), positions);
}
