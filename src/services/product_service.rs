use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::products::{
        CreateProductRequest, DeleteProductResult, ProductList, UpdateProductRequest,
    },
    entity::{
        categories::{Column as CategoryCol, Entity as Categories},
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{AdminProductQuery, CatalogQuery},
    state::AppState,
};

/// Storefront catalog: available products only.
pub async fn list_available(
    state: &AppState,
    query: CatalogQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let mut condition = Condition::all().add(Column::Available.eq(true));
    if let Some(category_id) = query.category_id {
        condition = condition.add(Column::CategoryId.eq(category_id));
    }

    let models = Products::find()
        .filter(condition)
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?;
    let total = models.len() as i64;
    let items = with_category_names(&state.orm, models).await?;

    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

pub async fn get_available(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = Products::find_by_id(id)
        .filter(Column::Available.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let product = single_with_category(&state.orm, product).await?;
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn list_products(
    state: &AppState,
    query: AdminProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    if let Some(category_id) = query.category_id {
        condition = condition.add(Column::CategoryId.eq(category_id));
    }
    if let Some(available) = query.available {
        condition = condition.add(Column::Available.eq(available));
    }

    let finder = Products::find()
        .filter(condition)
        .order_by_asc(Column::Name);
    let total = finder.clone().count(&state.orm).await? as i64;

    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let items = with_category_names(&state.orm, models).await?;

    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let product = single_with_category(&state.orm, product).await?;
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_category(&state.orm, payload.category_id).await?;

    let product = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        price: Set(payload.price.round_dp(2)),
        category_id: Set(payload.category_id),
        image: Set(payload.image),
        available: Set(payload.available.unwrap_or(true)),
        preparation_time: Set(payload.preparation_time.unwrap_or(15)),
        ingredients: Set(payload.ingredients),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(product_id = %product.id, "product created");
    let product = single_with_category(&state.orm, product).await?;
    Ok(ApiResponse::success("Product created", product, Some(Meta::empty())))
}

pub async fn update_product(
    state: &AppState,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    match payload {
        UpdateProductRequest::Availability(toggle) => {
            active.available = Set(toggle.available);
        }
        UpdateProductRequest::Full(full) => {
            ensure_category(&state.orm, full.category_id).await?;
            active.name = Set(full.name.trim().to_string());
            active.description = Set(full.description);
            active.price = Set(full.price.round_dp(2));
            active.category_id = Set(full.category_id);
            active.image = Set(full.image);
            if let Some(available) = full.available {
                active.available = Set(available);
            }
            if let Some(minutes) = full.preparation_time {
                active.preparation_time = Set(minutes);
            }
            active.ingredients = Set(full.ingredients);
        }
    }
    active.updated_at = Set(Utc::now().into());
    let product = active.update(&state.orm).await?;

    tracing::info!(product_id = %product.id, available = product.available, "product updated");
    let product = single_with_category(&state.orm, product).await?;
    Ok(ApiResponse::success("Updated", product, Some(Meta::empty())))
}

/// Products referenced by order items are disabled rather than removed.
pub async fn delete_product(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<DeleteProductResult>> {
    let txn = state.orm.begin().await?;

    let product = Products::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let references = OrderItems::find()
        .filter(OrderItemCol::ProductId.eq(id))
        .count(&txn)
        .await?;

    let soft_deleted = if references > 0 {
        let mut active: ActiveModel = product.into();
        active.available = Set(false);
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?;
        true
    } else {
        product.delete(&txn).await?;
        false
    };

    txn.commit().await?;

    tracing::info!(product_id = %id, soft_deleted, references, "product deleted");
    let message = if soft_deleted {
        "Product is referenced by orders and was disabled"
    } else {
        "Deleted"
    };
    Ok(ApiResponse::success(
        message,
        DeleteProductResult { id, soft_deleted },
        Some(Meta::empty()),
    ))
}

async fn ensure_category<C: ConnectionTrait>(conn: &C, category_id: Uuid) -> AppResult<()> {
    let exists = Categories::find()
        .filter(CategoryCol::Id.eq(category_id))
        .count(conn)
        .await?
        > 0;
    if !exists {
        return Err(AppError::validation("categoryId does not reference a category"));
    }
    Ok(())
}

async fn single_with_category<C: ConnectionTrait>(conn: &C, model: ProductModel) -> AppResult<Product> {
    let mut items = with_category_names(conn, vec![model]).await?;
    items.pop().ok_or(AppError::NotFound)
}

pub(crate) async fn with_category_names<C: ConnectionTrait>(
    conn: &C,
    models: Vec<ProductModel>,
) -> AppResult<Vec<Product>> {
    let mut category_ids: Vec<Uuid> = models.iter().map(|p| p.category_id).collect();
    category_ids.sort();
    category_ids.dedup();

    let names: HashMap<Uuid, String> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        Categories::find()
            .filter(CategoryCol::Id.is_in(category_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect()
    };

    Ok(models
        .into_iter()
        .map(|model| {
            let name = names.get(&model.category_id).cloned();
            Product::from_entity(model, name)
        })
        .collect())
}
