//! 顾客端业务逻辑服务

use crate::common::error::ServiceError;
use crate::common::normalize_email;
use crate::common::password::{hash_password, verify_password};
use crate::db::orders::{OrderLine, OrderRejection};
use crate::db::products::ProductFilter;
use crate::db::{Database, StoreError, orders, products, users};
use crate::jwt::JwtManager;
use crate::model::order::{Expansion, OrderView};
use crate::model::product::Product;
use crate::model::user::User;

use super::types::{
    AuthResponse, CustomerLoginRequest, PlaceOrderRequest, ProductQuery, RegisterRequest,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

impl From<OrderRejection> for ServiceError {
    fn from(rejection: OrderRejection) -> Self {
        let message = match rejection {
            OrderRejection::Empty => "Order must contain at least one item".to_string(),
            OrderRejection::InvalidQuantity { product } => {
                format!("Quantity must be at least 1 for product {}", product)
            }
            OrderRejection::UnknownProduct { product } => format!("Product {} not found", product),
            OrderRejection::OutOfStock { product } => format!("Insufficient stock for {}", product),
        };
        ServiceError::BadRequest(message)
    }
}

/// 顾客端服务
pub struct StorefrontService {
    db: Database,
    jwt: JwtManager,
    bcrypt_cost: u32,
}

impl StorefrontService {
    pub fn new(db: Database, jwt: JwtManager, bcrypt_cost: u32) -> Self {
        Self {
            db,
            jwt,
            bcrypt_cost,
        }
    }

    fn issue_token(&self, user: &User) -> Result<String, ServiceError> {
        self.jwt
            .issue_user_token(&user.id)
            .map_err(|e| ServiceError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// 注册新顾客
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, ServiceError> {
        let name = req.name.trim().to_string();
        let email = normalize_email(&req.email);
        if name.is_empty() || email.is_empty() || req.password.is_empty() {
            return Err(ServiceError::bad_request(
                "Name, email and password are required",
            ));
        }

        let password_hash = hash_password(&req.password, self.bcrypt_cost).await?;
        let user = User::new(name, email, req.phone, req.address, password_hash);

        // 查重和写入在同一次加锁内完成
        let saved = user.clone();
        let created = self
            .db
            .call(move |conn| {
                if users::find_by_email(conn, &saved.email)?.is_some() {
                    return Ok(false);
                }
                users::insert(conn, &saved)?;
                Ok(true)
            })
            .await?;
        if !created {
            return Err(ServiceError::bad_request("User already exists"));
        }

        tracing::info!(user_id = %user.id, email = %user.email, "顾客注册成功");
        let token = self.issue_token(&user)?;
        Ok(AuthResponse { token, user })
    }

    /// 顾客登录
    pub async fn login(&self, req: CustomerLoginRequest) -> Result<AuthResponse, ServiceError> {
        let email = normalize_email(&req.email);
        if email.is_empty() || req.password.is_empty() {
            return Err(ServiceError::bad_request(INVALID_CREDENTIALS));
        }

        let lookup = email.clone();
        let Some(user) = self
            .db
            .call(move |conn| users::find_by_email(conn, &lookup))
            .await?
        else {
            tracing::debug!(email = %email, "顾客登录失败: 账号不存在");
            return Err(ServiceError::bad_request(INVALID_CREDENTIALS));
        };

        if !verify_password(&req.password, &user.password_hash).await? {
            tracing::debug!(email = %email, "顾客登录失败: 密码不匹配");
            return Err(ServiceError::bad_request(INVALID_CREDENTIALS));
        }

        let token = self.issue_token(&user)?;
        Ok(AuthResponse { token, user })
    }

    /// 按 ID 查找顾客（认证中间件使用）
    pub async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let id = id.to_string();
        self.db.call(move |conn| users::find_by_id(conn, &id)).await
    }

    /// 商品列表，最新的在前
    pub async fn list_products(&self, query: ProductQuery) -> Result<Vec<Product>, ServiceError> {
        let filter = ProductFilter {
            category: query.category.filter(|c| !c.trim().is_empty()),
            search: query.search.filter(|s| !s.trim().is_empty()),
        };
        Ok(self.db.call(move |conn| products::list(conn, &filter)).await?)
    }

    pub async fn get_product(&self, id: &str) -> Result<Product, ServiceError> {
        let id = id.to_string();
        self.db
            .call(move |conn| products::find_by_id(conn, &id))
            .await?
            .ok_or_else(|| ServiceError::not_found("Product not found"))
    }

    /// 下单
    ///
    /// 价格取自商品目录，库存在同一事务中扣减
    pub async fn place_order(
        &self,
        user_id: &str,
        req: PlaceOrderRequest,
    ) -> Result<OrderView, ServiceError> {
        let mut lines = Vec::with_capacity(req.items.len());
        for item in req.items {
            let quantity = u32::try_from(item.quantity)
                .ok()
                .filter(|q| *q >= 1)
                .ok_or(OrderRejection::InvalidQuantity {
                    product: item.product.clone(),
                })?;
            lines.push(OrderLine {
                product: item.product,
                quantity,
            });
        }

        let user_id = user_id.to_string();
        let shipping = req.shipping_address;
        let payment_method = req.payment_method;
        let placed = self
            .db
            .call(move |conn| {
                match orders::place(conn, &user_id, &lines, shipping, &payment_method)? {
                    Ok(order) => Ok(Ok(orders::expand(conn, vec![order], Expansion::ProductsOnly)?)),
                    Err(rejection) => Ok(Err(rejection)),
                }
            })
            .await?;

        let order = placed?
            .pop()
            .ok_or_else(|| ServiceError::Internal("Order expansion returned nothing".into()))?;
        tracing::info!(
            order_id = %order.id,
            total_amount = order.total_amount,
            "订单已创建"
        );
        Ok(order)
    }

    /// 当前顾客的订单，最新的在前
    pub async fn my_orders(&self, user_id: &str) -> Result<Vec<OrderView>, ServiceError> {
        let user_id = user_id.to_string();
        Ok(self
            .db
            .call(move |conn| {
                let own = orders::list_by_user(conn, &user_id)?;
                orders::expand(conn, own, Expansion::ProductsOnly)
            })
            .await?)
    }

    /// 当前顾客的单个订单；他人的订单视为不存在
    pub async fn get_my_order(&self, user_id: &str, id: &str) -> Result<OrderView, ServiceError> {
        let user_id = user_id.to_string();
        let id = id.to_string();
        let order = self
            .db
            .call(move |conn| {
                let Some(order) = orders::find_by_id(conn, &id)?.filter(|o| o.user == user_id)
                else {
                    return Ok(None);
                };
                Ok(orders::expand(conn, vec![order], Expansion::ProductsOnly)?.pop())
            })
            .await?;

        order.ok_or_else(|| ServiceError::not_found("Order not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::products::sample;
    use crate::jwt::TOKEN_EXPIRY_SECONDS;
    use crate::storefront::types::OrderItemRequest;

    fn service() -> (StorefrontService, Database) {
        let db = Database::open_in_memory().unwrap();
        let jwt = JwtManager::new("storefront-secret", TOKEN_EXPIRY_SECONDS);
        (StorefrontService::new(db.clone(), jwt, 4), db)
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Dana".into(),
            email: email.into(),
            password: "secret1".into(),
            phone: None,
            address: None,
        }
    }

    async fn seed_product(db: &Database, price: f64, stock: i64) -> String {
        let product = sample("Maxi Dress", "dresses", price, stock);
        let id = product.id.clone();
        db.call(move |conn| products::insert(conn, &product))
            .await
            .unwrap();
        id
    }

    fn order_request(product: &str, quantity: i64) -> PlaceOrderRequest {
        PlaceOrderRequest {
            items: vec![OrderItemRequest {
                product: product.to_string(),
                quantity,
            }],
            shipping_address: None,
            payment_method: "cod".into(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (service, _) = service();
        let registered = service.register(register_request("Dana@Shop.test")).await.unwrap();
        assert_eq!(registered.user.email, "dana@shop.test");

        let duplicate = service
            .register(register_request("dana@shop.test"))
            .await
            .unwrap_err();
        assert!(matches!(duplicate, ServiceError::BadRequest(_)));

        let logged_in = service
            .login(CustomerLoginRequest {
                email: "dana@shop.test".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);

        let claims = service.jwt.verify_user_token(&logged_in.token).unwrap();
        assert_eq!(claims.user_id, registered.user.id);
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let (service, _) = service();
        let mut req = register_request("x@shop.test");
        req.password.clear();
        assert!(matches!(
            service.register(req).await.unwrap_err(),
            ServiceError::BadRequest(_)
        ));
    }

    #[tokio::test]
    async fn test_place_order_uses_catalog_price() {
        let (service, db) = service();
        let user = service.register(register_request("buyer@shop.test")).await.unwrap().user;
        let product_id = seed_product(&db, 40.0, 5).await;

        let order = service
            .place_order(&user.id, order_request(&product_id, 2))
            .await
            .unwrap();
        assert_eq!(order.total_amount, 80.0);
        assert_eq!(order.order_status, "pending");
        assert_eq!(order.payment_status, "pending");

        let product = service.get_product(&product_id).await.unwrap();
        assert_eq!(product.stock, 3);
    }

    #[tokio::test]
    async fn test_place_order_rejections() {
        let (service, db) = service();
        let user = service.register(register_request("buyer@shop.test")).await.unwrap().user;
        let product_id = seed_product(&db, 40.0, 1).await;

        for req in [
            order_request(&product_id, 0),
            order_request(&product_id, -3),
            order_request(&product_id, 2),
            order_request("ghost", 1),
            PlaceOrderRequest {
                items: vec![],
                shipping_address: None,
                payment_method: "cod".into(),
            },
        ] {
            let err = service.place_order(&user.id, req).await.unwrap_err();
            assert!(matches!(err, ServiceError::BadRequest(_)), "{:?}", err);
        }
        assert!(service.my_orders(&user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_orders_are_private() {
        let (service, db) = service();
        let alice = service.register(register_request("alice@shop.test")).await.unwrap().user;
        let bob = service.register(register_request("bob@shop.test")).await.unwrap().user;
        let product_id = seed_product(&db, 10.0, 10).await;

        let order = service
            .place_order(&alice.id, order_request(&product_id, 1))
            .await
            .unwrap();

        assert!(service.get_my_order(&alice.id, &order.id).await.is_ok());
        let err = service.get_my_order(&bob.id, &order.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert!(service.my_orders(&bob.id).await.unwrap().is_empty());
        assert_eq!(service.my_orders(&alice.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_product_filters() {
        let (service, db) = service();
        db.call(|conn| {
            products::insert(conn, &sample("Red Dress", "dresses", 30.0, 1))?;
            products::insert(conn, &sample("Straw Hat", "accessories", 12.0, 1))
        })
        .await
        .unwrap();

        let dresses = service
            .list_products(ProductQuery {
                category: Some("dresses".into()),
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(dresses.len(), 1);

        let hats = service
            .list_products(ProductQuery {
                category: Some(" ".into()),
                search: Some("hat".into()),
            })
            .await
            .unwrap();
        assert_eq!(hats.len(), 1);
        assert_eq!(hats[0].name, "Straw Hat");

        assert!(matches!(
            service.get_product("missing").await.unwrap_err(),
            ServiceError::NotFound(_)
        ));
    }
}
