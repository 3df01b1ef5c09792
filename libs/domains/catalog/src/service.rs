//! Catalog services - business logic layer
//!
//! Services validate input and enforce the catalog rules (unique names
//! and SKUs, hierarchy integrity, price and stock constraints) before
//! touching a repository. Repositories are shared behind `Arc` because
//! several services consult the same tables.

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::hierarchy;
use crate::models::{
    Brand, Category, CategoryNode, CreateBrand, CreateCategory, CreateProduct, CreateReview,
    Product, ProductFilter, ProductPage, Review, StockAdjustment, StockLevel, UpdateBrand,
    UpdateCategory, UpdateProduct,
};
use crate::repository::{BrandRepository, CategoryRepository, ProductRepository};

/// Category service providing business logic operations
pub struct CategoryService<C: CategoryRepository, P: ProductRepository> {
    categories: Arc<C>,
    products: Arc<P>,
}

impl<C: CategoryRepository, P: ProductRepository> CategoryService<C, P> {
    pub fn new(categories: Arc<C>, products: Arc<P>) -> Self {
        Self {
            categories,
            products,
        }
    }

    /// Create a new category
    #[instrument(skip(self, input), fields(category_name = %input.name))]
    pub async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        hierarchy::validate_unique_name(self.categories.as_ref(), &input.name, None).await?;

        // A new category has no descendants, so only parent existence matters
        if let Some(parent_id) = input.parent_id {
            self.categories
                .get_by_id(parent_id)
                .await?
                .ok_or(CatalogError::InvalidReference {
                    entity: "category",
                    id: parent_id,
                })?;
        }

        self.categories.create(input).await
    }

    /// Get a category by ID
    #[instrument(skip(self))]
    pub async fn get_category(&self, id: Uuid) -> CatalogResult<Category> {
        self.categories
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    /// List categories
    #[instrument(skip(self))]
    pub async fn list_categories(&self, include_inactive: bool) -> CatalogResult<Vec<Category>> {
        self.categories.list(include_inactive).await
    }

    /// List direct subcategories of a category
    #[instrument(skip(self))]
    pub async fn subcategories(&self, id: Uuid) -> CatalogResult<Vec<Category>> {
        self.get_category(id).await?;
        self.categories.list_children(id).await
    }

    /// Assemble the full category tree from active categories
    #[instrument(skip(self))]
    pub async fn category_tree(&self) -> CatalogResult<Vec<CategoryNode>> {
        let categories = self.categories.list(false).await?;
        Ok(build_tree(categories))
    }

    /// Update an existing category
    #[instrument(skip(self, input))]
    pub async fn update_category(
        &self,
        id: Uuid,
        input: UpdateCategory,
    ) -> CatalogResult<Category> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        self.get_category(id).await?;

        if let Some(ref new_name) = input.name {
            hierarchy::validate_unique_name(self.categories.as_ref(), new_name, Some(id)).await?;
        }
        if let Some(Some(parent_id)) = input.parent_id {
            hierarchy::validate_parent_assignment(self.categories.as_ref(), id, parent_id)
                .await?;
        }

        self.categories.update(id, input).await
    }

    /// Soft-delete a category
    ///
    /// Blocked while subcategories or products still reference it.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: Uuid) -> CatalogResult<()> {
        self.get_category(id).await?;
        hierarchy::validate_deletable(self.categories.as_ref(), self.products.as_ref(), id)
            .await?;

        self.categories.soft_delete(id).await?;
        Ok(())
    }
}

impl<C: CategoryRepository, P: ProductRepository> Clone for CategoryService<C, P> {
    fn clone(&self) -> Self {
        Self {
            categories: Arc::clone(&self.categories),
            products: Arc::clone(&self.products),
        }
    }
}

/// Arrange a flat category list into parent/child trees.
///
/// Categories whose parent is missing from the input (inactive or
/// deleted) surface as roots rather than vanishing.
fn build_tree(categories: Vec<Category>) -> Vec<CategoryNode> {
    use std::collections::HashMap;

    let ids: std::collections::HashSet<Uuid> = categories.iter().map(|c| c.id).collect();
    let mut children_of: HashMap<Uuid, Vec<Category>> = HashMap::new();
    let mut roots: Vec<Category> = Vec::new();

    for category in categories {
        match category.parent_id {
            Some(parent_id) if ids.contains(&parent_id) => {
                children_of.entry(parent_id).or_default().push(category);
            }
            _ => roots.push(category),
        }
    }

    fn attach(
        category: Category,
        children_of: &mut std::collections::HashMap<Uuid, Vec<Category>>,
    ) -> CategoryNode {
        let children = children_of
            .remove(&category.id)
            .unwrap_or_default()
            .into_iter()
            .map(|child| attach(child, children_of))
            .collect();
        CategoryNode { category, children }
    }

    roots
        .into_iter()
        .map(|root| attach(root, &mut children_of))
        .collect()
}

/// Brand service providing business logic operations
pub struct BrandService<B: BrandRepository, P: ProductRepository> {
    brands: Arc<B>,
    products: Arc<P>,
}

impl<B: BrandRepository, P: ProductRepository> BrandService<B, P> {
    pub fn new(brands: Arc<B>, products: Arc<P>) -> Self {
        Self { brands, products }
    }

    /// Create a new brand
    #[instrument(skip(self, input), fields(brand_name = %input.name))]
    pub async fn create_brand(&self, input: CreateBrand) -> CatalogResult<Brand> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        if self.brands.find_by_name(&input.name).await?.is_some() {
            return Err(CatalogError::DuplicateName(input.name));
        }

        self.brands.create(input).await
    }

    /// Get a brand by ID
    #[instrument(skip(self))]
    pub async fn get_brand(&self, id: Uuid) -> CatalogResult<Brand> {
        self.brands
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::BrandNotFound(id))
    }

    /// List brands
    #[instrument(skip(self))]
    pub async fn list_brands(&self, include_inactive: bool) -> CatalogResult<Vec<Brand>> {
        self.brands.list(include_inactive).await
    }

    /// Update an existing brand
    #[instrument(skip(self, input))]
    pub async fn update_brand(&self, id: Uuid, input: UpdateBrand) -> CatalogResult<Brand> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        self.get_brand(id).await?;

        if let Some(ref new_name) = input.name {
            if let Some(existing) = self.brands.find_by_name(new_name).await? {
                if existing.id != id {
                    return Err(CatalogError::DuplicateName(new_name.clone()));
                }
            }
        }

        self.brands.update(id, input).await
    }

    /// Soft-delete a brand
    ///
    /// Blocked while products still reference it.
    #[instrument(skip(self))]
    pub async fn delete_brand(&self, id: Uuid) -> CatalogResult<()> {
        self.get_brand(id).await?;

        if self.products.count_by_brand(id).await? > 0 {
            return Err(CatalogError::HasProducts {
                entity: "Brand",
                id,
            });
        }

        self.brands.soft_delete(id).await?;
        Ok(())
    }
}

impl<B: BrandRepository, P: ProductRepository> Clone for BrandService<B, P> {
    fn clone(&self) -> Self {
        Self {
            brands: Arc::clone(&self.brands),
            products: Arc::clone(&self.products),
        }
    }
}

/// Product service providing business logic operations
pub struct ProductService<P: ProductRepository, C: CategoryRepository, B: BrandRepository> {
    products: Arc<P>,
    categories: Arc<C>,
    brands: Arc<B>,
}

impl<P: ProductRepository, C: CategoryRepository, B: BrandRepository> ProductService<P, C, B> {
    pub fn new(products: Arc<P>, categories: Arc<C>, brands: Arc<B>) -> Self {
        Self {
            products,
            categories,
            brands,
        }
    }

    /// Create a new product
    #[instrument(skip(self, input), fields(product_name = %input.name, sku = %input.sku))]
    pub async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        if self.products.exists_by_sku(&input.sku, None).await? {
            return Err(CatalogError::DuplicateSku(input.sku));
        }

        self.categories
            .get_by_id(input.category_id)
            .await?
            .ok_or(CatalogError::InvalidReference {
                entity: "category",
                id: input.category_id,
            })?;
        self.brands
            .get_by_id(input.brand_id)
            .await?
            .ok_or(CatalogError::InvalidReference {
                entity: "brand",
                id: input.brand_id,
            })?;

        check_price_relationship(input.price_cents, input.discount_price_cents)?;

        self.products.create(input).await
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> CatalogResult<Product> {
        self.products
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))
    }

    /// Get a product by SKU
    #[instrument(skip(self))]
    pub async fn get_by_sku(&self, sku: &str) -> CatalogResult<Product> {
        self.products
            .get_by_sku(sku)
            .await?
            .ok_or_else(|| CatalogError::SkuNotFound(sku.to_string()))
    }

    /// List products matching the filter, paginated
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> CatalogResult<ProductPage> {
        self.products.list(filter).await
    }

    /// Update an existing product
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let existing = self.get_product(id).await?;

        if let Some(ref new_sku) = input.sku {
            if new_sku.to_lowercase() != existing.sku.to_lowercase()
                && self.products.exists_by_sku(new_sku, Some(id)).await?
            {
                return Err(CatalogError::DuplicateSku(new_sku.clone()));
            }
        }
        if let Some(category_id) = input.category_id {
            self.categories
                .get_by_id(category_id)
                .await?
                .ok_or(CatalogError::InvalidReference {
                    entity: "category",
                    id: category_id,
                })?;
        }
        if let Some(brand_id) = input.brand_id {
            self.brands
                .get_by_id(brand_id)
                .await?
                .ok_or(CatalogError::InvalidReference {
                    entity: "brand",
                    id: brand_id,
                })?;
        }

        // Check the price pair as it will stand after the update
        let price = input.price_cents.unwrap_or(existing.price_cents);
        let discount = match input.discount_price_cents {
            Some(discount) => discount,
            None => existing.discount_price_cents,
        };
        check_price_relationship(price, discount)?;

        self.products.update(id, input).await
    }

    /// Soft-delete a product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> CatalogResult<()> {
        self.get_product(id).await?;
        self.products.soft_delete(id).await?;
        Ok(())
    }

    /// Adjust stock by a delta
    #[instrument(skip(self, adjustment), fields(quantity = adjustment.quantity))]
    pub async fn adjust_stock(
        &self,
        id: Uuid,
        adjustment: StockAdjustment,
    ) -> CatalogResult<Product> {
        adjustment
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        self.get_product(id).await?;

        tracing::info!(product_id = %id, reason = %adjustment.reason, "Stock adjustment");
        self.products.adjust_stock(id, adjustment.quantity).await
    }

    /// Set the absolute stock quantity
    #[instrument(skip(self, level), fields(quantity = level.quantity))]
    pub async fn set_stock(&self, id: Uuid, level: StockLevel) -> CatalogResult<Product> {
        let existing = self.get_product(id).await?;

        if level.quantity < 0 {
            return Err(CatalogError::NegativeStock {
                current: existing.stock_quantity,
                requested: level.quantity,
            });
        }

        self.products.set_stock(id, level.quantity).await
    }

    /// Submit a review for a product
    #[instrument(skip(self, input), fields(rating = input.rating))]
    pub async fn add_review(&self, id: Uuid, input: CreateReview) -> CatalogResult<Review> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        self.get_product(id).await?;
        self.products.add_review(id, input).await
    }

    /// List reviews for a product, newest first
    #[instrument(skip(self))]
    pub async fn list_reviews(&self, id: Uuid) -> CatalogResult<Vec<Review>> {
        self.get_product(id).await?;
        self.products.list_reviews(id).await
    }
}

impl<P: ProductRepository, C: CategoryRepository, B: BrandRepository> Clone
    for ProductService<P, C, B>
{
    fn clone(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
            categories: Arc::clone(&self.categories),
            brands: Arc::clone(&self.brands),
        }
    }
}

/// A discount must undercut the list price, not merely match it.
fn check_price_relationship(price_cents: i64, discount_cents: Option<i64>) -> CatalogResult<()> {
    if let Some(discount_cents) = discount_cents {
        if discount_cents >= price_cents {
            return Err(CatalogError::InvalidPriceRelationship {
                price_cents,
                discount_cents,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Brand, Category};
    use crate::repository::{
        MockBrandRepository, MockCategoryRepository, MockProductRepository,
    };
    use chrono::Utc;
    use mockall::predicate::eq;

    fn category(id: Uuid, name: &str, parent_id: Option<Uuid>) -> Category {
        let now = Utc::now();
        Category {
            id,
            name: name.to_string(),
            description: None,
            image_url: None,
            parent_id,
            is_active: true,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn brand(id: Uuid, name: &str) -> Brand {
        let now = Utc::now();
        Brand {
            id,
            name: name.to_string(),
            description: None,
            logo_url: None,
            website: None,
            country: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn product(id: Uuid, sku: &str, category_id: Uuid, brand_id: Uuid) -> Product {
        let now = Utc::now();
        Product {
            id,
            name: format!("Product {sku}"),
            sku: sku.to_string(),
            description: None,
            category_id,
            brand_id,
            price_cents: 10_000,
            discount_price_cents: None,
            stock_quantity: 3,
            is_available: true,
            is_featured: false,
            average_rating: None,
            review_count: 0,
            tags: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn create_product_input(sku: &str, category_id: Uuid, brand_id: Uuid) -> CreateProduct {
        CreateProduct {
            name: format!("Product {sku}"),
            sku: sku.to_string(),
            description: None,
            category_id,
            brand_id,
            price_cents: 10_000,
            discount_price_cents: None,
            stock_quantity: 3,
            is_available: true,
            is_featured: false,
            average_rating: None,
            review_count: 0,
            tags: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_category_rejects_duplicate_name() {
        let mut categories = MockCategoryRepository::new();
        let existing = category(Uuid::now_v7(), "CPUs", None);
        categories
            .expect_find_by_name()
            .returning(move |_| Ok(Some(existing.clone())));
        let products = MockProductRepository::new();

        let service = CategoryService::new(Arc::new(categories), Arc::new(products));
        let result = service
            .create_category(CreateCategory {
                name: "cpus".to_string(),
                description: None,
                image_url: None,
                parent_id: None,
                is_active: true,
                sort_order: 0,
            })
            .await;
        assert!(matches!(result, Err(CatalogError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn test_create_category_rejects_missing_parent() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_name().returning(|_| Ok(None));
        categories.expect_get_by_id().returning(|_| Ok(None));
        let products = MockProductRepository::new();

        let service = CategoryService::new(Arc::new(categories), Arc::new(products));
        let result = service
            .create_category(CreateCategory {
                name: "GPUs".to_string(),
                description: None,
                image_url: None,
                parent_id: Some(Uuid::now_v7()),
                is_active: true,
                sort_order: 0,
            })
            .await;
        assert!(matches!(
            result,
            Err(CatalogError::InvalidReference { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_category_rejects_self_parent() {
        let id = Uuid::now_v7();
        let mut categories = MockCategoryRepository::new();
        let existing = category(id, "CPUs", None);
        categories
            .expect_get_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(existing.clone())));
        let products = MockProductRepository::new();

        let service = CategoryService::new(Arc::new(categories), Arc::new(products));
        let update = UpdateCategory {
            parent_id: Some(Some(id)),
            ..Default::default()
        };
        let result = service.update_category(id, update).await;
        assert!(matches!(result, Err(CatalogError::SelfReference)));
    }

    #[tokio::test]
    async fn test_delete_category_blocked_by_children() {
        let id = Uuid::now_v7();
        let mut categories = MockCategoryRepository::new();
        let existing = category(id, "Components", None);
        categories
            .expect_get_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        categories.expect_count_children().returning(|_| Ok(1));
        let products = MockProductRepository::new();

        let service = CategoryService::new(Arc::new(categories), Arc::new(products));
        let result = service.delete_category(id).await;
        assert!(matches!(result, Err(CatalogError::HasChildren(_))));
    }

    #[tokio::test]
    async fn test_delete_brand_blocked_by_products() {
        let id = Uuid::now_v7();
        let mut brands = MockBrandRepository::new();
        let existing = brand(id, "Initech");
        brands
            .expect_get_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        let mut products = MockProductRepository::new();
        products
            .expect_count_by_brand()
            .with(eq(id))
            .returning(|_| Ok(4));

        let service = BrandService::new(Arc::new(brands), Arc::new(products));
        let result = service.delete_brand(id).await;
        assert!(matches!(
            result,
            Err(CatalogError::HasProducts {
                entity: "Brand",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_create_product_rejects_discount_not_below_price() {
        let category_id = Uuid::now_v7();
        let brand_id = Uuid::now_v7();

        let mut categories = MockCategoryRepository::new();
        let cat = category(category_id, "CPUs", None);
        categories
            .expect_get_by_id()
            .returning(move |_| Ok(Some(cat.clone())));
        let mut brands = MockBrandRepository::new();
        let br = brand(brand_id, "Initech");
        brands
            .expect_get_by_id()
            .returning(move |_| Ok(Some(br.clone())));
        let mut products = MockProductRepository::new();
        products.expect_exists_by_sku().returning(|_, _| Ok(false));

        let service =
            ProductService::new(Arc::new(products), Arc::new(categories), Arc::new(brands));

        let mut input = create_product_input("CPU-1", category_id, brand_id);
        input.price_cents = 100;
        input.discount_price_cents = Some(100);
        let result = service.create_product(input).await;
        assert!(matches!(
            result,
            Err(CatalogError::InvalidPriceRelationship {
                price_cents: 100,
                discount_cents: 100,
            })
        ));
    }

    #[tokio::test]
    async fn test_create_product_rejects_unknown_brand() {
        let category_id = Uuid::now_v7();
        let brand_id = Uuid::now_v7();

        let mut categories = MockCategoryRepository::new();
        let cat = category(category_id, "CPUs", None);
        categories
            .expect_get_by_id()
            .returning(move |_| Ok(Some(cat.clone())));
        let mut brands = MockBrandRepository::new();
        brands.expect_get_by_id().returning(|_| Ok(None));
        let mut products = MockProductRepository::new();
        products.expect_exists_by_sku().returning(|_, _| Ok(false));

        let service =
            ProductService::new(Arc::new(products), Arc::new(categories), Arc::new(brands));
        let result = service
            .create_product(create_product_input("CPU-1", category_id, brand_id))
            .await;
        assert!(matches!(
            result,
            Err(CatalogError::InvalidReference {
                entity: "brand",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_update_product_checks_combined_price_pair() {
        // Price drops below the already stored discount
        let id = Uuid::now_v7();
        let existing = product(id, "CPU-1", Uuid::now_v7(), Uuid::now_v7());
        let mut with_discount = existing.clone();
        with_discount.discount_price_cents = Some(8_000);

        let mut products = MockProductRepository::new();
        products
            .expect_get_by_id()
            .returning(move |_| Ok(Some(with_discount.clone())));
        let categories = MockCategoryRepository::new();
        let brands = MockBrandRepository::new();

        let service =
            ProductService::new(Arc::new(products), Arc::new(categories), Arc::new(brands));
        let update = UpdateProduct {
            price_cents: Some(7_000),
            ..Default::default()
        };
        let result = service.update_product(id, update).await;
        assert!(matches!(
            result,
            Err(CatalogError::InvalidPriceRelationship { .. })
        ));
    }

    #[tokio::test]
    async fn test_set_stock_rejects_negative_quantity() {
        let id = Uuid::now_v7();
        let existing = product(id, "CPU-1", Uuid::now_v7(), Uuid::now_v7());
        let mut products = MockProductRepository::new();
        products
            .expect_get_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        let categories = MockCategoryRepository::new();
        let brands = MockBrandRepository::new();

        let service =
            ProductService::new(Arc::new(products), Arc::new(categories), Arc::new(brands));
        let result = service.set_stock(id, StockLevel { quantity: -1 }).await;
        assert!(matches!(result, Err(CatalogError::NegativeStock { .. })));
    }

    #[tokio::test]
    async fn test_add_review_rejects_missing_product() {
        let mut products = MockProductRepository::new();
        products.expect_get_by_id().returning(|_| Ok(None));
        let categories = MockCategoryRepository::new();
        let brands = MockBrandRepository::new();

        let service =
            ProductService::new(Arc::new(products), Arc::new(categories), Arc::new(brands));
        let result = service
            .add_review(
                Uuid::now_v7(),
                CreateReview {
                    customer_name: "Dana".to_string(),
                    customer_email: None,
                    rating: 5,
                    title: None,
                    comment: None,
                },
            )
            .await;
        assert!(matches!(result, Err(CatalogError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn test_add_review_rejects_out_of_range_rating() {
        // Validation fires before the repository is consulted
        let products = MockProductRepository::new();
        let categories = MockCategoryRepository::new();
        let brands = MockBrandRepository::new();

        let service =
            ProductService::new(Arc::new(products), Arc::new(categories), Arc::new(brands));
        let result = service
            .add_review(
                Uuid::now_v7(),
                CreateReview {
                    customer_name: "Dana".to_string(),
                    customer_email: None,
                    rating: 0,
                    title: None,
                    comment: None,
                },
            )
            .await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_build_tree_orphans_become_roots() {
        let root_id = Uuid::now_v7();
        let child_id = Uuid::now_v7();
        let orphan_id = Uuid::now_v7();

        let tree = build_tree(vec![
            category(root_id, "Components", None),
            category(child_id, "CPUs", Some(root_id)),
            category(orphan_id, "Clearance", Some(Uuid::now_v7())),
        ]);

        assert_eq!(tree.len(), 2);
        let components = tree
            .iter()
            .find(|n| n.category.id == root_id)
            .expect("root present");
        assert_eq!(components.children.len(), 1);
        assert_eq!(components.children[0].category.id, child_id);
        assert!(tree.iter().any(|n| n.category.id == orphan_id));
    }
}
