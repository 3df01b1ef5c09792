use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::{
    Brand, Category, CreateBrand, CreateCategory, CreateProduct, CreateReview, Product,
    ProductFilter, ProductPage, Review, UpdateBrand, UpdateCategory, UpdateProduct,
};

/// Repository trait for Category persistence
///
/// Soft-deleted categories are invisible to every method here; callers
/// never see `is_deleted` rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a new category
    async fn create(&self, input: CreateCategory) -> CatalogResult<Category>;

    /// Get a category by ID
    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Category>>;

    /// Find a category by name, case-insensitive
    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Category>>;

    /// List categories, optionally including inactive ones
    async fn list(&self, include_inactive: bool) -> CatalogResult<Vec<Category>>;

    /// List direct children of a category
    async fn list_children(&self, parent_id: Uuid) -> CatalogResult<Vec<Category>>;

    /// Update an existing category
    async fn update(&self, id: Uuid, input: UpdateCategory) -> CatalogResult<Category>;

    /// Soft-delete a category, returns whether a row was affected
    async fn soft_delete(&self, id: Uuid) -> CatalogResult<bool>;

    /// Count direct children of a category
    async fn count_children(&self, parent_id: Uuid) -> CatalogResult<u64>;

    /// Count all categories
    async fn count(&self) -> CatalogResult<u64>;
}

/// Repository trait for Brand persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrandRepository: Send + Sync {
    /// Create a new brand
    async fn create(&self, input: CreateBrand) -> CatalogResult<Brand>;

    /// Get a brand by ID
    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Brand>>;

    /// Find a brand by name, case-insensitive
    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Brand>>;

    /// List brands, optionally including inactive ones
    async fn list(&self, include_inactive: bool) -> CatalogResult<Vec<Brand>>;

    /// Update an existing brand
    async fn update(&self, id: Uuid, input: UpdateBrand) -> CatalogResult<Brand>;

    /// Soft-delete a brand, returns whether a row was affected
    async fn soft_delete(&self, id: Uuid) -> CatalogResult<bool>;
}

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>>;

    /// Get a product by SKU, case-insensitive
    async fn get_by_sku(&self, sku: &str) -> CatalogResult<Option<Product>>;

    /// List products matching the filter, paginated
    async fn list(&self, filter: ProductFilter) -> CatalogResult<ProductPage>;

    /// Update an existing product
    async fn update(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product>;

    /// Soft-delete a product, returns whether a row was affected
    async fn soft_delete(&self, id: Uuid) -> CatalogResult<bool>;

    /// Check if a SKU is taken, optionally excluding one product
    async fn exists_by_sku(&self, sku: &str, excluding: Option<Uuid>) -> CatalogResult<bool>;

    /// Count products belonging to a category
    async fn count_by_category(&self, category_id: Uuid) -> CatalogResult<u64>;

    /// Count products belonging to a brand
    async fn count_by_brand(&self, brand_id: Uuid) -> CatalogResult<u64>;

    /// Set the absolute stock quantity
    async fn set_stock(&self, id: Uuid, quantity: i32) -> CatalogResult<Product>;

    /// Adjust stock by a delta, failing if the result would go negative
    async fn adjust_stock(&self, id: Uuid, delta: i32) -> CatalogResult<Product>;

    /// Store a review and refresh the product's rating aggregates
    async fn add_review(&self, product_id: Uuid, input: CreateReview) -> CatalogResult<Review>;

    /// List reviews for a product, newest first
    async fn list_reviews(&self, product_id: Uuid) -> CatalogResult<Vec<Review>>;
}
