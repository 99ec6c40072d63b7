use aero_delivery_api::{
    build_app,
    config::{AppConfig, DEFAULT_MASTER_ADMIN_EMAIL},
    db::{create_orm_conn, run_migrations},
    dto::{
        admins::{CreateAdminRequest, UpdateAdminRequest},
        categories::CreateCategoryRequest,
        auth::LoginRequest,
        orders::{CreateOrderItem, CreateOrderRequest, UpdateOrderRequest, WhatsAppNoticeRequest},
        users::UpsertUserRequest,
    },
    entity::{
        DeliveryType, OrderStatus, PaymentMethod, PaymentStatus,
        admins::{Column as AdminCol, Entity as Admins},
        categories::ActiveModel as CategoryActive,
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{Column as OrderCol, Entity as Orders},
        products::{ActiveModel as ProductActive, Entity as Products, Model as ProductModel},
    },
    error::AppError,
    middleware::auth::AdminPrincipal,
    services::{
        admin_account_service, admin_order_service, auth_service, category_service,
        order_service, product_service, user_service,
    },
    state::AppState,
};
use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Method, Request, StatusCode, header},
};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use secrecy::SecretString;
use tokio::sync::OnceCell;
use tower::ServiceExt;
use uuid::Uuid;

// Migrations run once per test binary.
static MIGRATED: OnceCell<()> = OnceCell::const_new();

// Database-backed flows. Skipped unless a database is configured.
async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let orm = create_orm_conn(&database_url).await?;
    MIGRATED
        .get_or_try_init(|| async { run_migrations(&orm).await })
        .await?;
    let mut config = AppConfig::for_tests("flow-test-secret");
    config.database_url = database_url;
    Ok(Some(AppState::new(orm, config)))
}

fn master() -> AdminPrincipal {
    AdminPrincipal {
        admin_id: Uuid::new_v4(),
        email: DEFAULT_MASTER_ADMIN_EMAIL.to_string(),
        role: "ADMIN".into(),
        jti: Uuid::new_v4().to_string(),
    }
}

fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4().simple())
}

async fn create_product(state: &AppState, name: &str, cents: i64) -> anyhow::Result<ProductModel> {
    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(format!("Lanches {}", Uuid::new_v4().simple())),
        description: Set(None),
        active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(Some("for tests".into())),
        price: Set(Decimal::new(cents, 2)),
        category_id: Set(category.id),
        image: Set(None),
        available: Set(true),
        preparation_time: Set(15),
        ingredients: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(product)
}

async fn create_customer(state: &AppState) -> anyhow::Result<Uuid> {
    let resp = user_service::upsert_user(
        state,
        UpsertUserRequest {
            email: unique_email("customer"),
            name: Some("Ana".into()),
            phone: Some("(11) 98765-4321".into()),
            address: Some("Rua das Flores, 10".into()),
        },
    )
    .await?;
    Ok(resp.data.expect("user").id)
}

fn order_request(user_id: Uuid, items: Vec<(Uuid, i32)>, delivery_type: DeliveryType) -> CreateOrderRequest {
    CreateOrderRequest {
        user_id: Some(user_id),
        items: items
            .into_iter()
            .map(|(product_id, quantity)| CreateOrderItem {
                product_id,
                quantity,
                // Deliberately wrong: the catalog price must win.
                unit_price: Some(Decimal::new(1, 2)),
                notes: None,
            })
            .collect(),
        delivery_type,
        payment_method: PaymentMethod::Pix,
        delivery_address: None,
        customer_phone: None,
        notes: Some("Portão azul".into()),
        discount_amount: None,
    }
}

#[tokio::test]
async fn order_is_priced_from_catalog_and_managed_by_admin() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let product = create_product(&state, "X-Burger", 3590).await?;
    let user_id = create_customer(&state).await?;

    let created = order_service::create_order(
        &state,
        order_request(user_id, vec![(product.id, 1)], DeliveryType::Delivery),
    )
    .await?
    .data
    .expect("order detail");

    let order = &created.order;
    assert_eq!(order.total_amount, Decimal::new(3590, 2));
    assert_eq!(order.delivery_fee, Decimal::new(800, 2));
    assert_eq!(order.final_amount, Decimal::new(4390, 2));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert!(order.order_number.starts_with("AERO"));
    assert_eq!(order.order_number.len(), 13);
    assert_eq!(order.delivery_address.as_deref(), Some("Rua das Flores, 10"));
    assert_eq!(order.customer_phone.as_deref(), Some("(11) 98765-4321"));
    assert!(order.notes.as_deref().unwrap_or_default().contains("Portão azul"));
    assert_eq!(created.items.len(), 1);
    assert_eq!(created.items[0].item.unit_price, Decimal::new(3590, 2));

    let principal = master();
    let updated = admin_order_service::update_order(
        &state,
        &principal,
        order.id,
        UpdateOrderRequest {
            status: Some(OrderStatus::Preparing),
            payment_status: Some(PaymentStatus::Paid),
            note: Some("Cliente pediu pressa".into()),
        },
    )
    .await?
    .data
    .expect("updated order");
    assert_eq!(updated.order.status, OrderStatus::Preparing);
    assert_eq!(updated.order.payment_status, PaymentStatus::Paid);
    let notes = updated.order.notes.clone().unwrap_or_default();
    assert_eq!(notes.lines().count(), 4);
    assert!(notes.lines().next().unwrap_or_default().contains("Portão azul"));

    let backwards = admin_order_service::update_order(
        &state,
        &principal,
        order.id,
        UpdateOrderRequest {
            status: Some(OrderStatus::Pending),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(backwards, Err(AppError::BadRequest(_))));

    let notice = admin_order_service::send_whatsapp_notice(
        &state,
        &principal,
        order.id,
        WhatsAppNoticeRequest::default(),
    )
    .await?
    .data
    .expect("notice");
    assert_eq!(notice.phone, "5511987654321");
    assert!(!notice.sent);
    assert!(notice.link.unwrap_or_default().contains("phone=5511987654321"));
    assert_eq!(notice.order.notes.unwrap_or_default().lines().count(), 5);

    let fetched = admin_order_service::get_order(&state, order.id).await?.data.expect("order");
    assert_eq!(fetched.order.status, OrderStatus::Preparing);
    assert_eq!(fetched.customer.map(|c| c.id), Some(user_id));

    Ok(())
}

#[tokio::test]
async fn failed_order_leaves_no_rows() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let product = create_product(&state, "Pastel", 900).await?;
    let user_id = create_customer(&state).await?;

    let result = order_service::create_order(
        &state,
        order_request(
            user_id,
            vec![(product.id, 2), (Uuid::new_v4(), 1)],
            DeliveryType::Pickup,
        ),
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let mut unavailable: ProductActive = product.clone().into();
    unavailable.available = Set(false);
    unavailable.update(&state.orm).await?;
    let result = order_service::create_order(
        &state,
        order_request(user_id, vec![(product.id, 1)], DeliveryType::Pickup),
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let orders = Orders::find()
        .filter(OrderCol::UserId.eq(user_id))
        .count(&state.orm)
        .await?;
    assert_eq!(orders, 0);

    let missing_user = order_service::create_order(
        &state,
        order_request(Uuid::new_v4(), vec![(product.id, 1)], DeliveryType::Pickup),
    )
    .await;
    assert!(matches!(missing_user, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn referenced_products_are_only_disabled() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let ordered = create_product(&state, "Coxinha", 650).await?;
    let unused = create_product(&state, "Empada", 700).await?;
    let user_id = create_customer(&state).await?;
    order_service::create_order(
        &state,
        order_request(user_id, vec![(ordered.id, 1)], DeliveryType::Pickup),
    )
    .await?;

    let soft = product_service::delete_product(&state, ordered.id).await?.data.expect("result");
    assert!(soft.soft_deleted);
    let still_there = Products::find_by_id(ordered.id).one(&state.orm).await?.expect("row kept");
    assert!(!still_there.available);

    let hard = product_service::delete_product(&state, unused.id).await?.data.expect("result");
    assert!(!hard.soft_deleted);
    assert!(Products::find_by_id(unused.id).one(&state.orm).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn master_manages_admin_accounts() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let principal = master();
    let email = unique_email("staff");

    let created = admin_account_service::create_admin(
        &state,
        &principal,
        CreateAdminRequest {
            email: email.clone(),
            password: "secret123".into(),
            name: "Staff".into(),
        },
    )
    .await?
    .data
    .expect("admin");
    assert_eq!(created.email, email);
    assert!(created.user_id.is_some());
    let json = serde_json::to_value(&created)?;
    assert!(json.get("passwordHash").is_none());
    assert!(json.get("password").is_none());

    let duplicate = admin_account_service::create_admin(
        &state,
        &principal,
        CreateAdminRequest {
            email: email.to_uppercase(),
            password: "secret123".into(),
            name: "Again".into(),
        },
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let (_, cookie) = auth_service::login(
        &state,
        LoginRequest {
            email: email.clone(),
            password: "secret123".into(),
        },
    )
    .await?;
    assert!(cookie.starts_with("admin_session="));
    assert!(cookie.contains("HttpOnly"));

    let wrong = auth_service::login(
        &state,
        LoginRequest {
            email: email.clone(),
            password: "wrong-password".into(),
        },
    )
    .await;
    assert!(matches!(wrong, Err(AppError::Unauthorized)));

    let staff = AdminPrincipal {
        admin_id: created.id,
        email: email.clone(),
        role: "ADMIN".into(),
        jti: Uuid::new_v4().to_string(),
    };
    let forbidden = admin_account_service::delete_admin(&state, &staff, created.id).await;
    assert!(matches!(forbidden, Err(AppError::Forbidden)));

    let session = cookie_pair(&cookie);
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(&session)?);
    assert!(auth_service::verify_session(&state, &headers).is_some());

    admin_account_service::delete_admin(&state, &principal, created.id).await?;
    let gone = admin_account_service::delete_admin(&state, &principal, created.id).await;
    assert!(matches!(gone, Err(AppError::NotFound)));
    assert!(auth_service::verify_session(&state, &headers).is_none());
    Ok(())
}

/// `name=value` from a `Set-Cookie` header.
fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap_or_default().to_string()
}

#[tokio::test]
async fn master_account_cannot_be_renamed_or_deleted() -> anyhow::Result<()> {
    let Some(mut state) = setup_state().await? else {
        return Ok(());
    };
    let master_email = unique_email("master");
    let mut config = (*state.config).clone();
    config.master_admin_email = master_email.clone();
    config.master_admin_password = Some(SecretString::from("master-secret".to_string()));
    state = AppState::new(state.orm.clone(), config);

    assert!(admin_account_service::ensure_master_admin(&state.orm, &state.config).await?);
    assert!(!admin_account_service::ensure_master_admin(&state.orm, &state.config).await?);
    let master_row = Admins::find()
        .filter(AdminCol::Email.eq(master_email.as_str()))
        .one(&state.orm)
        .await?
        .expect("master admin row");

    let principal = AdminPrincipal {
        admin_id: master_row.id,
        email: master_email.clone(),
        role: "ADMIN".into(),
        jti: Uuid::new_v4().to_string(),
    };

    let renamed = admin_account_service::update_admin(
        &state,
        &principal,
        master_row.id,
        UpdateAdminRequest {
            email: Some(unique_email("renamed")),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(renamed, Err(AppError::Forbidden)));

    let deleted = admin_account_service::delete_admin(&state, &principal, master_row.id).await;
    assert!(matches!(deleted, Err(AppError::Forbidden)));

    let renamed_in_place = admin_account_service::update_admin(
        &state,
        &principal,
        master_row.id,
        UpdateAdminRequest {
            name: Some("Dona do Aero".into()),
            email: Some(master_email.to_uppercase()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("admin");
    assert_eq!(renamed_in_place.email, master_email);
    assert!(Admins::find_by_id(master_row.id).one(&state.orm).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn login_cookie_opens_admin_routes_until_logout() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let email = unique_email("ops");
    admin_account_service::create_admin(
        &state,
        &master(),
        CreateAdminRequest {
            email: email.clone(),
            password: "secret123".into(),
            name: "Ops".into(),
        },
    )
    .await?;
    let app = build_app(state.clone());

    let login = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "email": email, "password": "secret123" }).to_string(),
        ))?;
    let response = app.clone().oneshot(login).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("session cookie");
    let session = cookie_pair(set_cookie);
    assert!(session.starts_with("admin_session="));

    let with_cookie = |method: Method, uri: &str| {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, session.as_str())
            .body(Body::empty())
    };

    let response = app.clone().oneshot(with_cookie(Method::GET, "/api/admin/products")?).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(with_cookie(Method::POST, "/api/auth/logout")?).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(with_cookie(Method::GET, "/api/admin/products")?).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn item_failure_after_order_insert_rolls_back() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let good = create_product(&state, "Batata", 1200).await?;
    let rejected = create_product(&state, "Milkshake", 1800).await?;
    let user_id = create_customer(&state).await?;

    // Only rows for `rejected` violate this, so other tests are unaffected.
    let constraint = format!("reject_item_{}", rejected.id.simple());
    state
        .orm
        .execute_unprepared(&format!(
            "ALTER TABLE order_items ADD CONSTRAINT {constraint} CHECK (product_id <> '{}') NOT VALID",
            rejected.id
        ))
        .await?;

    let result = order_service::create_order(
        &state,
        order_request(
            user_id,
            vec![(good.id, 1), (rejected.id, 1)],
            DeliveryType::Pickup,
        ),
    )
    .await;

    state
        .orm
        .execute_unprepared(&format!("ALTER TABLE order_items DROP CONSTRAINT {constraint}"))
        .await?;

    assert!(matches!(result, Err(AppError::OrmError(_))));
    let orders = Orders::find()
        .filter(OrderCol::UserId.eq(user_id))
        .count(&state.orm)
        .await?;
    assert_eq!(orders, 0);
    let items = OrderItems::find()
        .filter(OrderItemCol::ProductId.eq(good.id))
        .count(&state.orm)
        .await?;
    assert_eq!(items, 0);
    Ok(())
}

#[tokio::test]
async fn concurrent_writers_get_success_or_conflict() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let email = unique_email("rush");
    let upserts = (0..16).map(|i| {
        let state = state.clone();
        let email = email.clone();
        tokio::spawn(async move {
            user_service::upsert_user(
                &state,
                UpsertUserRequest {
                    email,
                    name: Some(format!("Cliente {i}")),
                    phone: None,
                    address: None,
                },
            )
            .await
        })
    });
    let mut ids = Vec::new();
    for handle in upserts.collect::<Vec<_>>() {
        let user = handle.await??.data.expect("user");
        ids.push(user.id);
    }
    ids.dedup();
    assert_eq!(ids.len(), 1);

    let name = format!("Bebidas {}", Uuid::new_v4().simple());
    let creates = (0..8).map(|_| {
        let state = state.clone();
        let name = name.clone();
        tokio::spawn(async move {
            category_service::create_category(
                &state,
                CreateCategoryRequest {
                    name,
                    description: None,
                    active: None,
                },
            )
            .await
        })
    });
    let mut created = 0;
    for handle in creates.collect::<Vec<_>>() {
        match handle.await? {
            Ok(_) => created += 1,
            Err(AppError::Conflict(_)) => {}
            Err(other) => panic!("expected success or conflict, got {other:?}"),
        }
    }
    assert_eq!(created, 1);
    Ok(())
}
