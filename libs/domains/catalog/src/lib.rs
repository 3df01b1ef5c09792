//! Catalog Domain
//!
//! Categories, brands and products for a product catalog, backed by
//! Postgres with an in-memory store for tests and local development.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Services   │  ← Business rules: uniqueness, hierarchy, prices, stock
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repositories│  ← Traits + Postgres / in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, filter types
//! └─────────────┘
//! ```
//!
//! The listing rules (filtering, sorting, pagination) live in [`query`]
//! so the in-memory store and the Postgres repository agree on them.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_catalog::{
//!     handlers,
//!     postgres::{PgBrandRepository, PgCategoryRepository, PgProductRepository},
//!     service::{BrandService, CategoryService, ProductService},
//! };
//!
//! # async fn example(db: sea_orm::DatabaseConnection) {
//! let categories = Arc::new(PgCategoryRepository::new(db.clone()));
//! let brands = Arc::new(PgBrandRepository::new(db.clone()));
//! let products = Arc::new(PgProductRepository::new(db));
//!
//! let router = axum::Router::new()
//!     .nest(
//!         "/categories",
//!         handlers::categories_router(CategoryService::new(
//!             categories.clone(),
//!             products.clone(),
//!         )),
//!     )
//!     .nest(
//!         "/brands",
//!         handlers::brands_router(BrandService::new(brands.clone(), products.clone())),
//!     )
//!     .nest(
//!         "/products",
//!         handlers::products_router(ProductService::new(products, categories, brands)),
//!     );
//! # let _ = router;
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod hierarchy;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod query;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{CatalogError, CatalogResult};
pub use handlers::{BrandsApiDoc, CategoriesApiDoc, ProductsApiDoc};
pub use memory::InMemoryCatalog;
pub use models::{
    Brand, Category, CategoryNode, CreateBrand, CreateCategory, CreateProduct, CreateReview,
    Product, ProductFilter, ProductPage, Review, StockAdjustment, StockLevel, UpdateBrand,
    UpdateCategory, UpdateProduct,
};
pub use postgres::{PgBrandRepository, PgCategoryRepository, PgProductRepository};
pub use repository::{BrandRepository, CategoryRepository, ProductRepository};
pub use service::{BrandService, CategoryService, ProductService};
