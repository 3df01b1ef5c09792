//! In-memory catalog store for development and handler tests.
//!
//! Soft-deleted rows are invisible to every query, so plain removal is
//! the in-memory equivalent of flipping `is_deleted`. Listing reuses
//! [`crate::query`], which keeps its semantics identical to the
//! Postgres repositories.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Brand, Category, CreateBrand, CreateCategory, CreateProduct, CreateReview, Product,
    ProductFilter, ProductPage, Review, UpdateBrand, UpdateCategory, UpdateProduct,
};
use crate::query;
use crate::repository::{BrandRepository, CategoryRepository, ProductRepository};

/// In-memory implementation of the catalog repositories
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    categories: Arc<RwLock<HashMap<Uuid, Category>>>,
    brands: Arc<RwLock<HashMap<Uuid, Brand>>>,
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
    reviews: Arc<RwLock<HashMap<Uuid, Vec<Review>>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalog {
    async fn create(&self, input: CreateCategory) -> CatalogResult<Category> {
        let mut categories = self.categories.write().await;

        let name_exists = categories
            .values()
            .any(|c| c.name.to_lowercase() == input.name.to_lowercase());
        if name_exists {
            return Err(CatalogError::DuplicateName(input.name));
        }

        let category = Category::new(input);
        categories.insert(category.id, category.clone());

        tracing::info!(category_id = %category.id, "Created category");
        Ok(category)
    }

    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories
            .values()
            .find(|c| c.name.to_lowercase() == name.to_lowercase())
            .cloned())
    }

    async fn list(&self, include_inactive: bool) -> CatalogResult<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut result: Vec<Category> = categories
            .values()
            .filter(|c| include_inactive || c.is_active)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.name.cmp(&b.name)));
        Ok(result)
    }

    async fn list_children(&self, parent_id: Uuid) -> CatalogResult<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut result: Vec<Category> = categories
            .values()
            .filter(|c| c.parent_id == Some(parent_id))
            .cloned()
            .collect();
        result.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.name.cmp(&b.name)));
        Ok(result)
    }

    async fn update(&self, id: Uuid, input: UpdateCategory) -> CatalogResult<Category> {
        let mut categories = self.categories.write().await;

        if let Some(ref new_name) = input.name {
            let name_exists = categories
                .values()
                .any(|c| c.id != id && c.name.to_lowercase() == new_name.to_lowercase());
            if name_exists {
                return Err(CatalogError::DuplicateName(new_name.clone()));
            }
        }

        let category = categories
            .get_mut(&id)
            .ok_or(CatalogError::CategoryNotFound(id))?;
        category.apply_update(input);
        let updated = category.clone();

        tracing::info!(category_id = %id, "Updated category");
        Ok(updated)
    }

    async fn soft_delete(&self, id: Uuid) -> CatalogResult<bool> {
        let mut categories = self.categories.write().await;
        if categories.remove(&id).is_some() {
            tracing::info!(category_id = %id, "Deleted category");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn count_children(&self, parent_id: Uuid) -> CatalogResult<u64> {
        let categories = self.categories.read().await;
        Ok(categories
            .values()
            .filter(|c| c.parent_id == Some(parent_id))
            .count() as u64)
    }

    async fn count(&self) -> CatalogResult<u64> {
        let categories = self.categories.read().await;
        Ok(categories.len() as u64)
    }
}

#[async_trait]
impl BrandRepository for InMemoryCatalog {
    async fn create(&self, input: CreateBrand) -> CatalogResult<Brand> {
        let mut brands = self.brands.write().await;

        let name_exists = brands
            .values()
            .any(|b| b.name.to_lowercase() == input.name.to_lowercase());
        if name_exists {
            return Err(CatalogError::DuplicateName(input.name));
        }

        let brand = Brand::new(input);
        brands.insert(brand.id, brand.clone());

        tracing::info!(brand_id = %brand.id, "Created brand");
        Ok(brand)
    }

    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Brand>> {
        let brands = self.brands.read().await;
        Ok(brands.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Brand>> {
        let brands = self.brands.read().await;
        Ok(brands
            .values()
            .find(|b| b.name.to_lowercase() == name.to_lowercase())
            .cloned())
    }

    async fn list(&self, include_inactive: bool) -> CatalogResult<Vec<Brand>> {
        let brands = self.brands.read().await;
        let mut result: Vec<Brand> = brands
            .values()
            .filter(|b| include_inactive || b.is_active)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn update(&self, id: Uuid, input: UpdateBrand) -> CatalogResult<Brand> {
        let mut brands = self.brands.write().await;

        if let Some(ref new_name) = input.name {
            let name_exists = brands
                .values()
                .any(|b| b.id != id && b.name.to_lowercase() == new_name.to_lowercase());
            if name_exists {
                return Err(CatalogError::DuplicateName(new_name.clone()));
            }
        }

        let brand = brands.get_mut(&id).ok_or(CatalogError::BrandNotFound(id))?;
        brand.apply_update(input);
        let updated = brand.clone();

        tracing::info!(brand_id = %id, "Updated brand");
        Ok(updated)
    }

    async fn soft_delete(&self, id: Uuid) -> CatalogResult<bool> {
        let mut brands = self.brands.write().await;
        if brands.remove(&id).is_some() {
            tracing::info!(brand_id = %id, "Deleted brand");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product> {
        let mut products = self.products.write().await;

        let sku_exists = products
            .values()
            .any(|p| p.sku.to_lowercase() == input.sku.to_lowercase());
        if sku_exists {
            return Err(CatalogError::DuplicateSku(input.sku));
        }

        let product = Product::new(input);
        products.insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, sku = %product.sku, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn get_by_sku(&self, sku: &str) -> CatalogResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .find(|p| p.sku.to_lowercase() == sku.to_lowercase())
            .cloned())
    }

    async fn list(&self, filter: ProductFilter) -> CatalogResult<ProductPage> {
        let products = self.products.read().await;
        Ok(query::run(products.values().cloned(), &filter))
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product> {
        let mut products = self.products.write().await;

        if let Some(ref new_sku) = input.sku {
            let sku_exists = products
                .values()
                .any(|p| p.id != id && p.sku.to_lowercase() == new_sku.to_lowercase());
            if sku_exists {
                return Err(CatalogError::DuplicateSku(new_sku.clone()));
            }
        }

        let product = products
            .get_mut(&id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        product.apply_update(input);
        let updated = product.clone();

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated)
    }

    async fn soft_delete(&self, id: Uuid) -> CatalogResult<bool> {
        let mut products = self.products.write().await;
        if products.remove(&id).is_some() {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn exists_by_sku(&self, sku: &str, excluding: Option<Uuid>) -> CatalogResult<bool> {
        let products = self.products.read().await;
        Ok(products.values().any(|p| {
            Some(p.id) != excluding && p.sku.to_lowercase() == sku.to_lowercase()
        }))
    }

    async fn count_by_category(&self, category_id: Uuid) -> CatalogResult<u64> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|p| p.category_id == category_id)
            .count() as u64)
    }

    async fn count_by_brand(&self, brand_id: Uuid) -> CatalogResult<u64> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|p| p.brand_id == brand_id)
            .count() as u64)
    }

    async fn set_stock(&self, id: Uuid, quantity: i32) -> CatalogResult<Product> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        product.stock_quantity = quantity;
        product.updated_at = chrono::Utc::now();

        tracing::info!(product_id = %id, quantity, "Set stock");
        Ok(product.clone())
    }

    async fn adjust_stock(&self, id: Uuid, delta: i32) -> CatalogResult<Product> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .ok_or(CatalogError::ProductNotFound(id))?;

        let new_stock = product
            .stock_quantity
            .checked_add(delta)
            .ok_or(CatalogError::Validation(format!(
                "Stock adjustment out of range: current {}, requested change {delta}",
                product.stock_quantity
            )))?;
        if new_stock < 0 {
            return Err(CatalogError::NegativeStock {
                current: product.stock_quantity,
                requested: delta,
            });
        }
        product.stock_quantity = new_stock;
        product.updated_at = chrono::Utc::now();

        tracing::info!(product_id = %id, delta, new_stock, "Adjusted stock");
        Ok(product.clone())
    }

    async fn add_review(&self, product_id: Uuid, input: CreateReview) -> CatalogResult<Review> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&product_id)
            .ok_or(CatalogError::ProductNotFound(product_id))?;

        let mut reviews = self.reviews.write().await;
        let entries = reviews.entry(product_id).or_default();
        let review = Review::new(product_id, input);
        entries.push(review.clone());

        let count = entries.len() as i32;
        let average =
            entries.iter().map(|r| f64::from(r.rating)).sum::<f64>() / f64::from(count.max(1));
        product.average_rating = Some(average);
        product.review_count = count;
        product.updated_at = chrono::Utc::now();

        tracing::info!(product_id = %product_id, rating = review.rating, "Added review");
        Ok(review)
    }

    async fn list_reviews(&self, product_id: Uuid) -> CatalogResult<Vec<Review>> {
        let reviews = self.reviews.read().await;
        let mut result = reviews.get(&product_id).cloned().unwrap_or_default();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }
}
