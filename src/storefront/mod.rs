//! 顾客端模块
//!
//! 注册登录、商品浏览和下单

mod handlers;
mod middleware;
mod router;
mod service;
pub mod types;

pub use middleware::StorefrontState;
pub use router::create_storefront_router;
pub use service::StorefrontService;
