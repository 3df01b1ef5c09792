//! Postgres repositories backed by Sea-ORM.
//!
//! Every query filters `is_deleted = false`; soft-deleted rows never
//! reach the domain layer. Unique indexes (`uq_categories_name`,
//! `uq_brands_name`, `uq_products_sku`, see `schema.sql`) are the
//! authority on duplicates; the service-level checks are early exits
//! and violations surfacing here are mapped to the same errors.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, NullOrdering};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, ExprTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr,
};
use uuid::Uuid;

use crate::entity::{brand, category, product, review};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Brand, Category, CreateBrand, CreateCategory, CreateProduct, CreateReview, Product,
    ProductFilter, ProductPage, Review, UpdateBrand, UpdateCategory, UpdateProduct,
};
use crate::query::{self, SortDirection, SortField};
use crate::repository::{BrandRepository, CategoryRepository, ProductRepository};

/// Map a unique constraint violation to its domain error, based on the
/// constraint name embedded in the driver message.
fn map_unique_violation(err: sea_orm::DbErr, name: &str, sku: Option<&str>) -> CatalogError {
    if let Some(SqlErr::UniqueConstraintViolation(message)) = err.sql_err() {
        if message.contains("uq_products_sku") {
            if let Some(sku) = sku {
                return CatalogError::DuplicateSku(sku.to_string());
            }
        }
        if message.contains("uq_categories_name") || message.contains("uq_brands_name") {
            return CatalogError::DuplicateName(name.to_string());
        }
    }
    err.into()
}

pub struct PgCategoryRepository {
    db: DatabaseConnection,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, input: CreateCategory) -> CatalogResult<Category> {
        let name = input.name.clone();
        let active_model: category::ActiveModel = input.into();

        let model = category::Entity::insert(active_model)
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| map_unique_violation(e, &name, None))?;

        tracing::info!(category_id = %model.id, "Created category");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Category>> {
        let model = category::Entity::find_by_id(id)
            .filter(category::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        let model = category::Entity::find()
            .filter(category::Column::IsDeleted.eq(false))
            .filter(
                Expr::expr(Func::lower(Expr::col(category::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self, include_inactive: bool) -> CatalogResult<Vec<Category>> {
        let mut query = category::Entity::find().filter(category::Column::IsDeleted.eq(false));
        if !include_inactive {
            query = query.filter(category::Column::IsActive.eq(true));
        }
        let models = query
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_children(&self, parent_id: Uuid) -> CatalogResult<Vec<Category>> {
        let models = category::Entity::find()
            .filter(category::Column::IsDeleted.eq(false))
            .filter(category::Column::ParentId.eq(parent_id))
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, input: UpdateCategory) -> CatalogResult<Category> {
        let model = category::Entity::find_by_id(id)
            .filter(category::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))?;

        let mut domain: Category = model.into();
        domain.apply_update(input);

        let active_model = category::ActiveModel {
            id: Set(domain.id),
            name: Set(domain.name.clone()),
            description: Set(domain.description.clone()),
            image_url: Set(domain.image_url.clone()),
            parent_id: Set(domain.parent_id),
            is_active: Set(domain.is_active),
            sort_order: Set(domain.sort_order),
            is_deleted: Set(false),
            created_at: Set(domain.created_at.into()),
            updated_at: Set(domain.updated_at.into()),
        };

        let name = domain.name.clone();
        let updated = category::Entity::update(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| map_unique_violation(e, &name, None))?;

        tracing::info!(category_id = %id, "Updated category");
        Ok(updated.into())
    }

    async fn soft_delete(&self, id: Uuid) -> CatalogResult<bool> {
        let result = category::Entity::update_many()
            .col_expr(category::Column::IsDeleted, Expr::value(true))
            .col_expr(
                category::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(category::Column::Id.eq(id))
            .filter(category::Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(category_id = %id, "Deleted category");
        }
        Ok(result.rows_affected > 0)
    }

    async fn count_children(&self, parent_id: Uuid) -> CatalogResult<u64> {
        let count = category::Entity::find()
            .filter(category::Column::IsDeleted.eq(false))
            .filter(category::Column::ParentId.eq(parent_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn count(&self) -> CatalogResult<u64> {
        let count = category::Entity::find()
            .filter(category::Column::IsDeleted.eq(false))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}

pub struct PgBrandRepository {
    db: DatabaseConnection,
}

impl PgBrandRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BrandRepository for PgBrandRepository {
    async fn create(&self, input: CreateBrand) -> CatalogResult<Brand> {
        let name = input.name.clone();
        let active_model: brand::ActiveModel = input.into();

        let model = brand::Entity::insert(active_model)
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| map_unique_violation(e, &name, None))?;

        tracing::info!(brand_id = %model.id, "Created brand");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Brand>> {
        let model = brand::Entity::find_by_id(id)
            .filter(brand::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Brand>> {
        let model = brand::Entity::find()
            .filter(brand::Column::IsDeleted.eq(false))
            .filter(
                Expr::expr(Func::lower(Expr::col(brand::Column::Name))).eq(name.to_lowercase()),
            )
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self, include_inactive: bool) -> CatalogResult<Vec<Brand>> {
        let mut query = brand::Entity::find().filter(brand::Column::IsDeleted.eq(false));
        if !include_inactive {
            query = query.filter(brand::Column::IsActive.eq(true));
        }
        let models = query.order_by_asc(brand::Column::Name).all(&self.db).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, input: UpdateBrand) -> CatalogResult<Brand> {
        let model = brand::Entity::find_by_id(id)
            .filter(brand::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(CatalogError::BrandNotFound(id))?;

        let mut domain: Brand = model.into();
        domain.apply_update(input);

        let active_model = brand::ActiveModel {
            id: Set(domain.id),
            name: Set(domain.name.clone()),
            description: Set(domain.description.clone()),
            logo_url: Set(domain.logo_url.clone()),
            website: Set(domain.website.clone()),
            country: Set(domain.country.clone()),
            is_active: Set(domain.is_active),
            is_deleted: Set(false),
            created_at: Set(domain.created_at.into()),
            updated_at: Set(domain.updated_at.into()),
        };

        let name = domain.name.clone();
        let updated = brand::Entity::update(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| map_unique_violation(e, &name, None))?;

        tracing::info!(brand_id = %id, "Updated brand");
        Ok(updated.into())
    }

    async fn soft_delete(&self, id: Uuid) -> CatalogResult<bool> {
        let result = brand::Entity::update_many()
            .col_expr(brand::Column::IsDeleted, Expr::value(true))
            .col_expr(brand::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(brand::Column::Id.eq(id))
            .filter(brand::Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(brand_id = %id, "Deleted brand");
        }
        Ok(result.rows_affected > 0)
    }
}

pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product> {
        let name = input.name.clone();
        let sku = input.sku.clone();
        let active_model: product::ActiveModel = input.into();

        let model = product::Entity::insert(active_model)
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| map_unique_violation(e, &name, Some(&sku)))?;

        tracing::info!(product_id = %model.id, sku = %model.sku, "Created product");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let model = product::Entity::find_by_id(id)
            .filter(product::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn get_by_sku(&self, sku: &str) -> CatalogResult<Option<Product>> {
        let model = product::Entity::find()
            .filter(product::Column::IsDeleted.eq(false))
            .filter(
                Expr::expr(Func::lower(Expr::col(product::Column::Sku))).eq(sku.to_lowercase()),
            )
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self, filter: ProductFilter) -> CatalogResult<ProductPage> {
        let mut select = product::Entity::find()
            .filter(product::Column::IsDeleted.eq(false))
            .filter(product::Column::IsAvailable.eq(true));

        if let Some(category_id) = filter.category_id {
            select = select.filter(product::Column::CategoryId.eq(category_id));
        }
        if let Some(brand_id) = filter.brand_id {
            select = select.filter(product::Column::BrandId.eq(brand_id));
        }
        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", search.to_lowercase());
            select = select.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(product::Column::Name)))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(product::Column::Description)))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(product::Column::Tags))).like(pattern),
                    ),
            );
        }
        if let Some(min_price) = filter.min_price {
            select = select.filter(product::Column::PriceCents.gte(min_price));
        }
        if let Some(max_price) = filter.max_price {
            select = select.filter(product::Column::PriceCents.lte(max_price));
        }
        if let Some(in_stock) = filter.in_stock {
            select = if in_stock {
                select.filter(product::Column::StockQuantity.gt(0))
            } else {
                select.filter(product::Column::StockQuantity.eq(0))
            };
        }
        if let Some(featured) = filter.featured {
            select = select.filter(product::Column::IsFeatured.eq(featured));
        }
        if let Some(min_rating) = filter.min_rating {
            // SQL NULL never satisfies >=, so unrated products drop out
            select = select.filter(product::Column::AverageRating.gte(min_rating));
        }

        // Count after filtering, before pagination
        let total = select.clone().count(&self.db).await?;

        let (field, direction) = query::sort_spec(&filter);
        let order = match direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };
        select = match field {
            SortField::Name => select.order_by(
                Expr::expr(Func::lower(Expr::col(product::Column::Name))),
                order,
            ),
            SortField::Price => select.order_by(product::Column::PriceCents, order),
            // Unrated rows sort below any rating, matching the in-memory engine
            SortField::Rating => {
                let nulls = match direction {
                    SortDirection::Asc => NullOrdering::First,
                    SortDirection::Desc => NullOrdering::Last,
                };
                select.order_by_with_nulls(product::Column::AverageRating, order, nulls)
            }
            SortField::Date => select.order_by(product::Column::CreatedAt, order),
        };

        let (page, page_size) = query::normalize_page(&filter);
        let models = select
            .offset(page.saturating_sub(1).saturating_mul(page_size))
            .limit(page_size)
            .all(&self.db)
            .await?;

        let items = models.into_iter().map(Into::into).collect();
        Ok(ProductPage::new(items, page, page_size, total))
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product> {
        let model = product::Entity::find_by_id(id)
            .filter(product::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))?;

        let mut domain: Product = model.into();
        domain.apply_update(input);

        let active_model = product::ActiveModel {
            id: Set(domain.id),
            name: Set(domain.name.clone()),
            sku: Set(domain.sku.clone()),
            description: Set(domain.description.clone()),
            category_id: Set(domain.category_id),
            brand_id: Set(domain.brand_id),
            price_cents: Set(domain.price_cents),
            discount_price_cents: Set(domain.discount_price_cents),
            stock_quantity: Set(domain.stock_quantity),
            is_available: Set(domain.is_available),
            is_featured: Set(domain.is_featured),
            average_rating: Set(domain.average_rating),
            review_count: Set(domain.review_count),
            tags: Set(domain.tags.clone()),
            is_deleted: Set(false),
            created_at: Set(domain.created_at.into()),
            updated_at: Set(domain.updated_at.into()),
        };

        let name = domain.name.clone();
        let sku = domain.sku.clone();
        let updated = product::Entity::update(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| map_unique_violation(e, &name, Some(&sku)))?;

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated.into())
    }

    async fn soft_delete(&self, id: Uuid) -> CatalogResult<bool> {
        let result = product::Entity::update_many()
            .col_expr(product::Column::IsDeleted, Expr::value(true))
            .col_expr(product::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(product::Column::Id.eq(id))
            .filter(product::Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(result.rows_affected > 0)
    }

    async fn exists_by_sku(&self, sku: &str, excluding: Option<Uuid>) -> CatalogResult<bool> {
        let mut select = product::Entity::find()
            .filter(product::Column::IsDeleted.eq(false))
            .filter(
                Expr::expr(Func::lower(Expr::col(product::Column::Sku))).eq(sku.to_lowercase()),
            );
        if let Some(excluding) = excluding {
            select = select.filter(product::Column::Id.ne(excluding));
        }
        Ok(select.count(&self.db).await? > 0)
    }

    async fn count_by_category(&self, category_id: Uuid) -> CatalogResult<u64> {
        let count = product::Entity::find()
            .filter(product::Column::IsDeleted.eq(false))
            .filter(product::Column::CategoryId.eq(category_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn count_by_brand(&self, brand_id: Uuid) -> CatalogResult<u64> {
        let count = product::Entity::find()
            .filter(product::Column::IsDeleted.eq(false))
            .filter(product::Column::BrandId.eq(brand_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn set_stock(&self, id: Uuid, quantity: i32) -> CatalogResult<Product> {
        let model = product::Entity::find_by_id(id)
            .filter(product::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))?;

        let mut active_model: product::ActiveModel = model.into();
        active_model.stock_quantity = Set(quantity);
        active_model.updated_at = Set(chrono::Utc::now().into());

        let updated = product::Entity::update(active_model).exec(&self.db).await?;
        tracing::info!(product_id = %id, quantity, "Set stock");
        Ok(updated.into())
    }

    async fn adjust_stock(&self, id: Uuid, delta: i32) -> CatalogResult<Product> {
        let model = product::Entity::find_by_id(id)
            .filter(product::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))?;

        let new_stock = model
            .stock_quantity
            .checked_add(delta)
            .ok_or(CatalogError::Validation(format!(
                "Stock adjustment out of range: current {}, requested change {delta}",
                model.stock_quantity
            )))?;
        if new_stock < 0 {
            return Err(CatalogError::NegativeStock {
                current: model.stock_quantity,
                requested: delta,
            });
        }

        let mut active_model: product::ActiveModel = model.into();
        active_model.stock_quantity = Set(new_stock);
        active_model.updated_at = Set(chrono::Utc::now().into());

        let updated = product::Entity::update(active_model).exec(&self.db).await?;
        tracing::info!(product_id = %id, delta, new_stock, "Adjusted stock");
        Ok(updated.into())
    }

    async fn add_review(&self, product_id: Uuid, input: CreateReview) -> CatalogResult<Review> {
        let model = product::Entity::find_by_id(product_id)
            .filter(product::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(CatalogError::ProductNotFound(product_id))?;

        let stored = review::Entity::insert(review::ActiveModel::from(Review::new(
            product_id, input,
        )))
        .exec_with_returning(&self.db)
        .await?;

        let ratings: Vec<i32> = review::Entity::find()
            .filter(review::Column::ProductId.eq(product_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|r| r.rating)
            .collect();
        let count = ratings.len() as i32;
        let average = ratings.iter().map(|&r| f64::from(r)).sum::<f64>() / f64::from(Ord::max(count, 1));

        let mut active_model: product::ActiveModel = model.into();
        active_model.average_rating = Set(Some(average));
        active_model.review_count = Set(count);
        active_model.updated_at = Set(chrono::Utc::now().into());
        product::Entity::update(active_model).exec(&self.db).await?;

        tracing::info!(product_id = %product_id, rating = stored.rating, "Added review");
        Ok(stored.into())
    }

    async fn list_reviews(&self, product_id: Uuid) -> CatalogResult<Vec<Review>> {
        let models = review::Entity::find()
            .filter(review::Column::ProductId.eq(product_id))
            .order_by_desc(review::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}
