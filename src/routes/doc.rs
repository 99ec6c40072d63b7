use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admins::{AdminList, CreateAdminRequest, UpdateAdminRequest},
        auth::LoginRequest,
        categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
        orders::{
            CreateOrderItem, CreateOrderRequest, CustomerSummary, NoticeTemplate, OrderDetail,
            OrderLine, OrderList, UpdateOrderRequest, WhatsAppNoticeRequest, WhatsAppNoticeResult,
        },
        pix::UpsertPixRequest,
        products::{
            AvailabilityUpdate, CreateProductRequest, DeleteProductResult, FullProductUpdate,
            ProductList, UpdateProductRequest,
        },
        users::UpsertUserRequest,
    },
    entity::{DeliveryType, OrderStatus, PaymentMethod, PaymentStatus, UserRole},
    middleware::auth::AdminPrincipal,
    models::{AdminProfile, Category, Order, OrderItem, PixConfig, Product, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, categories, health, orders, pix, products, users},
    services::auth_service::SESSION_COOKIE,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "admin_session",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        categories::list_categories,
        users::upsert_user,
        orders::create_order,
        pix::get_pix,
        auth::login,
        auth::logout,
        admin::me,
        admin::products::list_products,
        admin::products::create_product,
        admin::products::get_product,
        admin::products::update_product,
        admin::products::delete_product,
        admin::categories::list_categories,
        admin::categories::create_category,
        admin::categories::update_category,
        admin::orders::list_orders,
        admin::orders::get_order,
        admin::orders::update_order,
        admin::orders::send_whatsapp,
        admin::admins::list_admins,
        admin::admins::create_admin,
        admin::admins::update_admin,
        admin::admins::delete_admin,
        admin::pix::upsert_pix
    ),
    components(
        schemas(
            Category,
            Product,
            User,
            AdminProfile,
            AdminPrincipal,
            Order,
            OrderItem,
            PixConfig,
            OrderStatus,
            PaymentStatus,
            PaymentMethod,
            DeliveryType,
            UserRole,
            LoginRequest,
            UpsertUserRequest,
            CreateOrderRequest,
            CreateOrderItem,
            CustomerSummary,
            OrderLine,
            OrderDetail,
            OrderList,
            UpdateOrderRequest,
            NoticeTemplate,
            WhatsAppNoticeRequest,
            WhatsAppNoticeResult,
            CreateProductRequest,
            UpdateProductRequest,
            FullProductUpdate,
            AvailabilityUpdate,
            ProductList,
            DeleteProductResult,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CategoryList,
            CreateAdminRequest,
            UpdateAdminRequest,
            AdminList,
            UpsertPixRequest,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<OrderDetail>,
            ApiResponse<OrderList>,
            ApiResponse<AdminProfile>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Storefront catalog"),
        (name = "Users", description = "Customer records"),
        (name = "Orders", description = "Order submission"),
        (name = "Payments", description = "PIX reference data"),
        (name = "Auth", description = "Admin session cookie"),
        (name = "Admin", description = "Back-office endpoints"),
        (name = "Admin accounts", description = "Master-only admin management"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
