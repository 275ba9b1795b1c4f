//! Admin API 路由配置

use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};

use super::{
    auth_handlers::{admin_status, login},
    handlers::{
        create_product, delete_product, get_all_orders, get_all_users, get_dashboard_stats,
        get_order, get_user, update_order_status, update_product,
    },
    middleware::{AdminState, admin_auth_middleware},
};

/// 创建 Admin API 路由
///
/// # 端点
/// - `POST /login` - 管理员登录（无需认证）
/// - `GET /test` - 路由可用性检查（无需认证）
/// - `GET /stats` - 仪表盘统计
/// - `GET /users` - 所有顾客
/// - `GET /users/:id` - 顾客详情及订单
/// - `GET /orders` - 所有订单
/// - `GET /orders/:id` - 订单详情
/// - `PATCH /orders/:id/status` - 更新订单状态
/// - `POST /products` - 创建商品
/// - `PUT /products/:id` - 更新商品
/// - `DELETE /products/:id` - 删除商品
///
/// # 认证
/// 除登录和检查端点外均需要 `Authorization: Bearer <token>`
pub fn create_admin_router(state: AdminState) -> Router {
    let protected = Router::new()
        .route("/stats", get(get_dashboard_stats))
        .route("/users", get(get_all_users))
        .route("/users/{id}", get(get_user))
        .route("/orders", get(get_all_orders))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/products", post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    Router::new()
        .route("/login", post(login))
        .route("/test", get(admin_status))
        .merge(protected)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::AdminService;
    use crate::db::{Database, orders, products, users};
    use crate::jwt::{JwtManager, TOKEN_EXPIRY_SECONDS};
    use crate::model::order::{Order, OrderItem};
    use crate::model::user::User;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const SECRET: &str = "router-test-secret";

    struct Fixture {
        app: Router,
        db: Database,
        jwt: JwtManager,
    }

    async fn fixture() -> Fixture {
        let db = Database::open_in_memory().unwrap();
        let jwt = JwtManager::new(SECRET, TOKEN_EXPIRY_SECONDS);
        let service = AdminService::new(db.clone(), jwt.clone(), 4);
        service
            .ensure_default_admin("Admin", "admin@shop.test", "Admin@123")
            .await
            .unwrap();
        let app = create_admin_router(AdminState::new(jwt.clone(), service));
        Fixture { app, db, jwt }
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
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

    async fn send_raw(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        content_type: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let response = app
            .clone()
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn admin_id(db: &Database) -> String {
        db.call(|conn| crate::db::admins::find_by_email(conn, "admin@shop.test"))
            .await
            .unwrap()
            .unwrap()
            .id
    }

    async fn login_token(app: &Router) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "admin@shop.test", "password": "Admin@123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    async fn seed_order(db: &Database) -> String {
        db.call(|conn| {
            let user = User::new("Carol", "carol@shop.test", Some("555".into()), None, "h".into());
            users::insert(conn, &user)?;
            let product = products::sample("Linen Dress", "dresses", 80.0, 3);
            products::insert(conn, &product)?;
            let order = Order::new(
                user.id.clone(),
                vec![OrderItem {
                    product: product.id.clone(),
                    quantity: 1,
                    price: 80.0,
                }],
                None,
                "cod",
            );
            orders::insert(conn, &order)?;
            Ok(order.id)
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_public_routes() {
        let f = fixture().await;
        let (status, body) = send(&f.app, Method::GET, "/test", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Admin routes working");

        let (status, body) = send(
            &f.app,
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "admin@shop.test", "password": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let f = fixture().await;
        let (status, body) = send(&f.app, Method::GET, "/stats", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "No authorization header");

        let (status, body) = send(&f.app, Method::GET, "/orders", Some("not-a-jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid token");

        // 顾客 Token 不能用于管理端
        let user_token = f.jwt.issue_user_token("some-user").unwrap();
        let (status, _) = send(&f.app, Method::GET, "/users", Some(&user_token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let orphan = f.jwt.issue_admin_token("deleted-admin").unwrap();
        let (status, body) = send(&f.app, Method::GET, "/stats", Some(&orphan), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Admin not found");
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_rejected() {
        let f = fixture().await;
        let admin_id = admin_id(&f.db).await;

        let forged = JwtManager::new("other-secret", TOKEN_EXPIRY_SECONDS)
            .issue_admin_token(&admin_id)
            .unwrap();
        let (status, body) = send(&f.app, Method::GET, "/stats", Some(&forged), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid token");

        let genuine = f.jwt.issue_admin_token(&admin_id).unwrap();
        let (status, _) = send(&f.app, Method::GET, "/stats", Some(&genuine), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_bodies_get_json_errors() {
        let f = fixture().await;
        let order_id = seed_order(&f.db).await;
        let token = login_token(&f.app).await;

        // 缺少 Content-Type
        let (status, body) = send_raw(
            &f.app,
            Method::POST,
            "/login",
            None,
            None,
            r#"{"email":"admin@shop.test","password":"Admin@123"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());

        let (status, body) = send_raw(
            &f.app,
            Method::PATCH,
            &format!("/orders/{}/status", order_id),
            Some(&token),
            Some("application/json"),
            "not json",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
        assert_eq!(body["type"], "invalid_request");

        let (status, body) = send_raw(
            &f.app,
            Method::POST,
            "/products",
            Some(&token),
            Some("application/json"),
            r#"{"name":"Hat","price":"cheap"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let f = fixture().await;
        let admin_id = admin_id(&f.db).await;
        let stale = f.jwt.issue_admin_token_at(&admin_id, 1_000).unwrap();
        let (status, body) = send(&f.app, Method::GET, "/stats", Some(&stale), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid token");
    }

    #[tokio::test]
    async fn test_stats_and_listings() {
        let f = fixture().await;
        let order_id = seed_order(&f.db).await;
        let token = login_token(&f.app).await;

        let (status, stats) = send(&f.app, Method::GET, "/stats", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["totalUsers"], 1);
        assert_eq!(stats["totalOrders"], 1);
        assert_eq!(stats["totalRevenue"], 80.0);
        assert_eq!(stats["recentOrders"][0]["user"]["name"], "Carol");
        assert_eq!(stats["recentOrders"][0]["items"][0]["product"]["name"], "Linen Dress");

        let (status, orders) = send(&f.app, Method::GET, "/orders", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(orders.as_array().unwrap().len(), 1);
        assert_eq!(orders[0]["id"], order_id.as_str());

        let (status, users) = send(&f.app, Method::GET, "/users", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(users[0]["email"], "carol@shop.test");
        assert!(users[0].get("passwordHash").is_none());

        let user_id = users[0]["id"].as_str().unwrap().to_string();
        let (status, detail) =
            send(&f.app, Method::GET, &format!("/users/{}", user_id), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["orders"].as_array().unwrap().len(), 1);

        let (status, _) = send(&f.app, Method::GET, "/users/missing", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_order_status() {
        let f = fixture().await;
        let order_id = seed_order(&f.db).await;
        let token = login_token(&f.app).await;
        let uri = format!("/orders/{}/status", order_id);

        let (status, body) = send(
            &f.app,
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "paymentStatus": "paid" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Order status updated successfully");
        assert_eq!(body["order"]["paymentStatus"], "paid");
        assert_eq!(body["order"]["orderStatus"], "pending");
        assert_eq!(body["order"]["user"]["email"], "carol@shop.test");

        let (status, body) = send(
            &f.app,
            Method::PATCH,
            "/orders/missing/status",
            Some(&token),
            Some(json!({ "orderStatus": "shipped" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Order not found");
    }

    #[tokio::test]
    async fn test_product_management() {
        let f = fixture().await;
        let token = login_token(&f.app).await;

        let (status, created) = send(
            &f.app,
            Method::POST,
            "/products",
            Some(&token),
            Some(json!({ "name": "Silk Scarf", "price": 19.5, "category": "accessories", "stock": 4 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, updated) = send(
            &f.app,
            Method::PUT,
            &format!("/products/{}", id),
            Some(&token),
            Some(json!({ "stock": 9 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["stock"], 9);
        assert_eq!(updated["name"], "Silk Scarf");

        let (status, _) =
            send(&f.app, Method::DELETE, &format!("/products/{}", id), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) =
            send(&f.app, Method::DELETE, &format!("/products/{}", id), Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
