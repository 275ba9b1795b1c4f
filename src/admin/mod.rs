//! Admin 模块
//!
//! # 功能
//! - 管理员登录（JWT，7 天有效）
//! - 仪表盘统计
//! - 顾客与订单查询、订单状态更新
//! - 商品管理

mod auth_handlers;
mod handlers;
mod middleware;
mod router;
mod service;
pub mod types;

pub use middleware::AdminState;
pub use router::create_admin_router;
pub use service::AdminService;
