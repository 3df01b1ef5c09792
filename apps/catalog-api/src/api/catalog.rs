//! Catalog API routes

use axum::Router;
use domain_catalog::{
    handlers, BrandService, CategoryService, PgBrandRepository, PgCategoryRepository,
    PgProductRepository, ProductService,
};
use std::sync::Arc;

use crate::state::AppState;

/// Create the catalog routers over shared Postgres repositories
pub fn routes(state: &AppState) -> Router {
    let categories = Arc::new(PgCategoryRepository::new(state.db.clone()));
    let brands = Arc::new(PgBrandRepository::new(state.db.clone()));
    let products = Arc::new(PgProductRepository::new(state.db.clone()));

    Router::new()
        .nest(
            "/categories",
            handlers::categories_router(CategoryService::new(
                categories.clone(),
                products.clone(),
            )),
        )
        .nest(
            "/brands",
            handlers::brands_router(BrandService::new(brands.clone(), products.clone())),
        )
        .nest(
            "/products",
            handlers::products_router(ProductService::new(products, categories, brands)),
        )
}
