//! Admin API 业务逻辑服务

use crate::common::error::ServiceError;
use crate::common::normalize_email;
use crate::common::password::{hash_password, verify_password};
use crate::db::{Database, StoreError, admins, orders, products, users};
use crate::jwt::JwtManager;
use crate::model::admin::Admin;
use crate::model::order::{Expansion, OrderView};
use crate::model::product::Product;
use crate::model::user::User;

use super::types::{
    AdminProfile, CreateProductRequest, DashboardStats, LoginRequest, LoginResponse,
    UpdateOrderStatusRequest, UpdateProductRequest, UserDetailResponse,
};

/// 仪表盘展示的最近订单数
const RECENT_ORDERS_LIMIT: u32 = 10;

/// 登录失败的统一提示，不区分邮箱不存在和密码错误
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Admin 服务
///
/// 封装所有 Admin API 的业务逻辑
pub struct AdminService {
    db: Database,
    jwt: JwtManager,
    bcrypt_cost: u32,
}

impl AdminService {
    pub fn new(db: Database, jwt: JwtManager, bcrypt_cost: u32) -> Self {
        Self {
            db,
            jwt,
            bcrypt_cost,
        }
    }

    /// 管理员登录，返回 7 天有效的 Token
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, ServiceError> {
        let email = normalize_email(&req.email);
        if email.is_empty() || req.password.is_empty() {
            return Err(ServiceError::bad_request(INVALID_CREDENTIALS));
        }

        let lookup = email.clone();
        let admin = self
            .db
            .call(move |conn| admins::find_by_email(conn, &lookup))
            .await?;

        let Some(admin) = admin else {
            tracing::warn!(email = %email, "管理员登录失败: 账号不存在");
            return Err(ServiceError::bad_request(INVALID_CREDENTIALS));
        };

        if !verify_password(&req.password, &admin.password_hash).await? {
            tracing::warn!(email = %email, "管理员登录失败: 密码不匹配");
            return Err(ServiceError::bad_request(INVALID_CREDENTIALS));
        }

        let token = self.jwt.issue_admin_token(&admin.id).map_err(|e| {
            ServiceError::Internal(format!("Failed to generate token: {}", e))
        })?;

        tracing::info!(admin_id = %admin.id, email = %admin.email, "管理员登录成功");

        Ok(LoginResponse {
            token,
            admin: AdminProfile {
                id: admin.id,
                name: admin.name,
                email: admin.email,
                role: admin.role,
            },
        })
    }

    /// 确保默认管理员存在
    ///
    /// 返回是否新建了管理员
    pub async fn ensure_default_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<bool, ServiceError> {
        let email = normalize_email(email);
        let lookup = email.clone();
        let existing = self
            .db
            .call(move |conn| admins::find_by_email(conn, &lookup))
            .await?;
        if existing.is_some() {
            tracing::debug!(email = %email, "默认管理员已存在");
            return Ok(false);
        }

        let password_hash = hash_password(password, self.bcrypt_cost).await?;
        let admin = Admin::new(name, email, password_hash);
        let (admin_id, admin_email) = (admin.id.clone(), admin.email.clone());
        self.db.call(move |conn| admins::insert(conn, &admin)).await?;

        tracing::info!(admin_id = %admin_id, email = %admin_email, "已创建默认管理员");
        Ok(true)
    }

    /// 按 ID 查找管理员（认证中间件使用）
    pub async fn find_admin(&self, id: &str) -> Result<Option<Admin>, StoreError> {
        let id = id.to_string();
        self.db.call(move |conn| admins::find_by_id(conn, &id)).await
    }

    /// 仪表盘统计
    ///
    /// 四个查询相互独立，不保证彼此之间的一致性
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ServiceError> {
        let (total_users, total_orders, total_revenue, recent_orders) = tokio::try_join!(
            self.db.call(|conn| users::count(conn)),
            self.db.call(|conn| orders::count(conn)),
            self.db.call(|conn| orders::total_revenue(conn)),
            self.db.call(|conn| {
                let recent = orders::list_recent(conn, RECENT_ORDERS_LIMIT)?;
                orders::expand(conn, recent, Expansion::Summary)
            }),
        )?;

        Ok(DashboardStats {
            total_users,
            total_orders,
            total_revenue,
            recent_orders,
        })
    }

    /// 全部顾客（不含密码）
    pub async fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.db.call(|conn| users::list(conn)).await?)
    }

    /// 顾客详情及其全部订单
    pub async fn get_user_detail(&self, id: &str) -> Result<UserDetailResponse, ServiceError> {
        let id = id.to_string();
        let detail = self
            .db
            .call(move |conn| {
                let Some(user) = users::find_by_id(conn, &id)? else {
                    return Ok(None);
                };
                let user_orders = orders::list_by_user(conn, &id)?;
                let orders = orders::expand(conn, user_orders, Expansion::ProductsOnly)?;
                Ok(Some(UserDetailResponse { user, orders }))
            })
            .await?;

        detail.ok_or_else(|| ServiceError::not_found("User not found"))
    }

    /// 全部订单
    pub async fn list_orders(&self) -> Result<Vec<OrderView>, ServiceError> {
        Ok(self
            .db
            .call(|conn| {
                let all = orders::list(conn)?;
                orders::expand(conn, all, Expansion::Summary)
            })
            .await?)
    }

    /// 订单详情
    pub async fn get_order(&self, id: &str) -> Result<OrderView, ServiceError> {
        let id = id.to_string();
        let order = self
            .db
            .call(move |conn| {
                let Some(order) = orders::find_by_id(conn, &id)? else {
                    return Ok(None);
                };
                Ok(orders::expand(conn, vec![order], Expansion::Full)?.pop())
            })
            .await?;

        order.ok_or_else(|| ServiceError::not_found("Order not found"))
    }

    /// 更新订单状态和/或支付状态
    ///
    /// 读取、修改、整条写回；并发更新同一订单时后写者生效
    pub async fn update_order_status(
        &self,
        id: &str,
        req: UpdateOrderStatusRequest,
    ) -> Result<OrderView, ServiceError> {
        let id = id.to_string();
        let order = self
            .db
            .call(move |conn| {
                let Some(mut order) = orders::find_by_id(conn, &id)? else {
                    return Ok(None);
                };
                if order.apply_status_update(
                    req.order_status.as_deref(),
                    req.payment_status.as_deref(),
                ) {
                    orders::save_status(conn, &order)?;
                }
                Ok(orders::expand(conn, vec![order], Expansion::Full)?.pop())
            })
            .await?;

        let order = order.ok_or_else(|| ServiceError::not_found("Order not found"))?;
        tracing::info!(
            order_id = %order.id,
            order_status = %order.order_status,
            payment_status = %order.payment_status,
            "订单状态已更新"
        );
        Ok(order)
    }

    /// 创建商品
    pub async fn create_product(&self, req: CreateProductRequest) -> Result<Product, ServiceError> {
        let product = Product {
            id: crate::model::new_id(),
            name: req.name.trim().to_string(),
            description: req.description,
            price: req.price,
            category: req.category.trim().to_string(),
            sizes: req.sizes,
            images: req.images,
            stock: req.stock,
            created_at: crate::model::now_rfc3339(),
        };
        validate_product(&product)?;

        let saved = product.clone();
        self.db.call(move |conn| products::insert(conn, &saved)).await?;

        tracing::info!(product_id = %product.id, name = %product.name, "商品已创建");
        Ok(product)
    }

    /// 部分更新商品
    pub async fn update_product(
        &self,
        id: &str,
        req: UpdateProductRequest,
    ) -> Result<Product, ServiceError> {
        let lookup = id.to_string();
        let mut product = self
            .db
            .call(move |conn| products::find_by_id(conn, &lookup))
            .await?
            .ok_or_else(|| ServiceError::not_found("Product not found"))?;

        if let Some(name) = req.name {
            product.name = name.trim().to_string();
        }
        if let Some(description) = req.description {
            product.description = description;
        }
        if let Some(price) = req.price {
            product.price = price;
        }
        if let Some(category) = req.category {
            product.category = category.trim().to_string();
        }
        if let Some(sizes) = req.sizes {
            product.sizes = sizes;
        }
        if let Some(images) = req.images {
            product.images = images;
        }
        if let Some(stock) = req.stock {
            product.stock = stock;
        }
        validate_product(&product)?;

        let saved = product.clone();
        let replaced = self
            .db
            .call(move |conn| products::replace(conn, &saved))
            .await?;
        if !replaced {
            // 读取和写回之间被删除
            return Err(ServiceError::not_found("Product not found"));
        }
        Ok(product)
    }

    /// 删除商品（已有订单中的引用展开为 null）
    pub async fn delete_product(&self, id: &str) -> Result<(), ServiceError> {
        let id = id.to_string();
        let deleted_id = id.clone();
        let deleted = self
            .db
            .call(move |conn| products::delete(conn, &deleted_id))
            .await?;
        if !deleted {
            return Err(ServiceError::not_found("Product not found"));
        }
        tracing::info!(product_id = %id, "商品已删除");
        Ok(())
    }
}

fn validate_product(product: &Product) -> Result<(), ServiceError> {
    if product.name.is_empty() {
        return Err(ServiceError::bad_request("Product name is required"));
    }
    if !product.price.is_finite() || product.price < 0.0 {
        return Err(ServiceError::bad_request("Price must be a non-negative number"));
    }
    if product.stock < 0 {
        return Err(ServiceError::bad_request("Stock cannot be negative"));
    }
    Ok(())
}
