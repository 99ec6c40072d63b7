pub mod admin_account_service;
pub mod admin_order_service;
pub mod auth_service;
pub mod category_service;
pub mod order_service;
pub mod pix_service;
pub mod product_service;
pub mod user_service;
