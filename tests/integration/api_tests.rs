//! HTTP API tests
//!
//! Drives the full application (middleware stack and routes) against an
//! in-memory database.

#[cfg(test)]
mod tests {
    use crate::common::{TestDatabase, fixtures};
    use actix_web::http::StatusCode;
    use actix_web::{test, web};
    use blog_rs::core::models::{DEFAULT_ROLE_ID, SUPER_ADMIN_ROLE_ID};
    use blog_rs::server::HttpServer;
    use blog_rs::server::middleware::REQUEST_ID_HEADER;
    use serde_json::{Value, json};

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }

    #[actix_web::test]
    async fn test_health() {
        let db = TestDatabase::new().await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(db.app_state()))).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(res.headers().get("server").unwrap(), "blog-rs");

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "healthy");
    }

    #[actix_web::test]
    async fn test_register_login_profile() {
        let db = TestDatabase::new().await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(db.app_state()))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "username": "grace",
                "password": "s3cret-pass",
                "email": "grace@example.com"
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["username"], "grace");
        assert!(body["data"].get("password_hash").is_none());

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({ "username": "grace", "password": "s3cret-pass" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "CONFLICT");

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "username": "grace", "password": "wrong-pass" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "username": "grace", "password": "s3cret-pass" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["token_type"], "Bearer");
        assert_eq!(body["data"]["user"]["role_keys"], json!(["user"]));
        let access = body["data"]["access_token"].as_str().unwrap().to_string();
        let refresh = body["data"]["refresh_token"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/api/v1/user/profile")
            .insert_header(bearer(&access))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["username"], "grace");
        assert_eq!(body["data"]["role_ids"], json!([DEFAULT_ROLE_ID]));

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(json!({ "refresh_token": refresh }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["data"]["access_token"].is_string());

        // a refresh token is not an access token
        let req = test::TestRequest::get()
            .uri("/api/v1/user/profile")
            .insert_header(bearer(&refresh))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_malformed_body_is_bad_request() {
        let db = TestDatabase::new().await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(db.app_state()))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[actix_web::test]
    async fn test_admin_routes_are_gated() {
        let db = TestDatabase::new().await;
        let state = db.app_state();
        let jwt = state.auth.jwt.clone();
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/admin/api/v1/roles").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let member = jwt.create_access_token(20, "member", vec![DEFAULT_ROLE_ID]).unwrap();
        let req = test::TestRequest::get()
            .uri("/admin/api/v1/roles")
            .insert_header(bearer(&member))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "FORBIDDEN");

        let admin = jwt.create_access_token(10, "root", vec![SUPER_ADMIN_ROLE_ID]).unwrap();
        let req = test::TestRequest::get()
            .uri("/admin/api/v1/roles?page=1&page_size=10")
            .insert_header(bearer(&admin))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["total"], 2);
        assert_eq!(body["data"]["pages"], 1);
    }

    #[actix_web::test]
    async fn test_granted_permission_opens_admin_route() {
        let db = TestDatabase::new().await;
        let state = db.app_state();
        let jwt = state.auth.jwt.clone();
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let admin = jwt.create_access_token(10, "root", vec![SUPER_ADMIN_ROLE_ID]).unwrap();
        let req = test::TestRequest::post()
            .uri("/admin/api/v1/permissions")
            .insert_header(bearer(&admin))
            .set_json(json!({
                "perm_name": "Read categories",
                "perm_key": "content:category:read",
                "perm_type": 3,
                "api_path": "GET:/admin/api/v1/categories/*"
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert!(res.status().is_success());
        let body: Value = test::read_body_json(res).await;
        let perm_id = body["data"]["perm_id"].as_i64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/admin/api/v1/roles/{}/permissions", DEFAULT_ROLE_ID))
            .insert_header(bearer(&admin))
            .set_json(json!({ "perm_ids": [perm_id] }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], json!([perm_id]));

        let member = jwt.create_access_token(20, "member", vec![DEFAULT_ROLE_ID]).unwrap();
        let req = test::TestRequest::get()
            .uri("/admin/api/v1/categories/tree")
            .insert_header(bearer(&member))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/admin/api/v1/categories")
            .insert_header(bearer(&member))
            .set_json(json!({ "category_name": "News", "category_key": "news" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        // disabling the permission closes the route again
        let req = test::TestRequest::put()
            .uri(&format!("/admin/api/v1/permissions/{}/status", perm_id))
            .insert_header(bearer(&admin))
            .set_json(json!({ "enabled": false }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/admin/api/v1/categories/tree")
            .insert_header(bearer(&member))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_public_category_tree() {
        let db = TestDatabase::new().await;
        let root = db.categories().create(fixtures::category("tech", None)).await.unwrap();
        db.categories()
            .create(fixtures::category("rust", Some(root.category_id)))
            .await
            .unwrap();
        let mut hidden = fixtures::category("drafts", None);
        hidden.is_visible = false;
        db.categories().create(hidden).await.unwrap();

        let app = test::init_service(HttpServer::create_app(web::Data::new(db.app_state()))).await;
        let req = test::TestRequest::get().uri("/api/v1/categories/tree").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let roots = body["data"].as_array().unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0]["category_key"], "tech");
        assert_eq!(roots[0]["children"][0]["category_key"], "rust");
        assert_eq!(
            roots[0]["children"][0]["path"],
            format!("{}/{}", root.category_id, root.category_id + 1)
        );
    }

    #[actix_web::test]
    async fn test_user_menus_follow_token_roles() {
        let db = TestDatabase::new().await;
        let content = db.permissions().create(fixtures::menu("content", None)).await.unwrap();
        db.permissions().create(fixtures::menu("system", None)).await.unwrap();
        db.roles()
            .replace_permissions(DEFAULT_ROLE_ID, &[content.perm_id])
            .await
            .unwrap();

        let state = db.app_state();
        let jwt = state.auth.jwt.clone();
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let member = jwt.create_access_token(20, "member", vec![DEFAULT_ROLE_ID]).unwrap();
        let req = test::TestRequest::get()
            .uri("/api/v1/user/menus")
            .insert_header(bearer(&member))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let keys: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|node| node["perm_key"].as_str())
            .collect();
        assert_eq!(keys, vec!["content"]);
    }

    macro_rules! login_status {
        ($app:expr, $username:expr, $password:expr) => {{
            let req = test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({ "username": $username, "password": $password }))
                .to_request();
            test::call_service(&$app, req).await.status()
        }};
    }

    #[actix_web::test]
    async fn test_self_service_profile_and_password() {
        let db = TestDatabase::new().await;
        db.users().create(fixtures::user("heidi"), &[DEFAULT_ROLE_ID]).await.unwrap();
        let state = db.app_state();
        let jwt = state.auth.jwt.clone();
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({ "username": "ivan", "password": "first-pass" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let user_id = body["data"]["user_id"].as_i64().unwrap() as i32;
        let token = jwt.create_access_token(user_id, "ivan", vec![DEFAULT_ROLE_ID]).unwrap();

        let req = test::TestRequest::put()
            .uri("/api/v1/user/profile")
            .insert_header(bearer(&token))
            .set_json(json!({ "nickname": "Ivan", "email": "ivan@example.com" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["nickname"], "Ivan");
        assert_eq!(body["data"]["email"], "ivan@example.com");
        assert_eq!(body["data"]["role_keys"], json!(["user"]));

        let req = test::TestRequest::put()
            .uri("/api/v1/user/profile")
            .insert_header(bearer(&token))
            .set_json(json!({ "email": "heidi@example.com" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::put()
            .uri("/api/v1/user/password")
            .insert_header(bearer(&token))
            .set_json(json!({ "old_password": "wrong-pass", "new_password": "second-pass" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put()
            .uri("/api/v1/user/password")
            .insert_header(bearer(&token))
            .set_json(json!({ "old_password": "first-pass", "new_password": "second-pass" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        assert_eq!(login_status!(app, "ivan", "first-pass"), StatusCode::UNAUTHORIZED);
        assert_eq!(login_status!(app, "ivan", "second-pass"), StatusCode::OK);

        let admin = jwt.create_access_token(10, "root", vec![SUPER_ADMIN_ROLE_ID]).unwrap();
        let req = test::TestRequest::put()
            .uri(&format!("/admin/api/v1/users/{}/password", user_id))
            .insert_header(bearer(&admin))
            .set_json(json!({ "password": "abc" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put()
            .uri(&format!("/admin/api/v1/users/{}/password", user_id))
            .insert_header(bearer(&admin))
            .set_json(json!({ "password": "third-pass" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(login_status!(app, "ivan", "third-pass"), StatusCode::OK);

        // members cannot reset other accounts
        let req = test::TestRequest::put()
            .uri(&format!("/admin/api/v1/users/{}/password", user_id))
            .insert_header(bearer(&token))
            .set_json(json!({ "password": "fourth-pass" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_category_options() {
        let db = TestDatabase::new().await;
        let root = db.categories().create(fixtures::category("tech", None)).await.unwrap();
        db.categories()
            .create(fixtures::category("rust", Some(root.category_id)))
            .await
            .unwrap();
        let mut hidden = fixtures::category("drafts", None);
        hidden.is_visible = false;
        db.categories().create(hidden).await.unwrap();

        let state = db.app_state();
        let jwt = state.auth.jwt.clone();
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let admin = jwt.create_access_token(10, "root", vec![SUPER_ADMIN_ROLE_ID]).unwrap();
        let req = test::TestRequest::get()
            .uri("/admin/api/v1/categories/options")
            .insert_header(bearer(&admin))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["data"],
            json!([
                { "label": "Category tech", "value": root.category_id },
                { "label": "Category rust", "value": root.category_id + 1 },
            ])
        );
    }

    #[actix_web::test]
    async fn test_gate_storage_failure_is_internal_error() {
        use sea_orm::ConnectionTrait;

        let db = TestDatabase::new().await;
        let state = db.app_state();
        let jwt = state.auth.jwt.clone();
        db.db()
            .connection()
            .execute_unprepared("DROP TABLE sys_role_permissions")
            .await
            .unwrap();
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let member = jwt.create_access_token(20, "member", vec![DEFAULT_ROLE_ID]).unwrap();
        let req = test::TestRequest::get()
            .uri("/admin/api/v1/roles")
            .insert_header(bearer(&member))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], false);

        // the super administrator bypass never reads grants
        let admin = jwt.create_access_token(10, "root", vec![SUPER_ADMIN_ROLE_ID]).unwrap();
        let req = test::TestRequest::get()
            .uri("/admin/api/v1/categories/tree")
            .insert_header(bearer(&admin))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
