use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Category entity - a node in the category hierarchy
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    /// Unique identifier
    pub id: Uuid,
    /// Category name (unique among non-deleted categories)
    pub name: String,
    /// Category description
    pub description: Option<String>,
    /// Image URL for category listings
    pub image_url: Option<String>,
    /// Parent category, `None` for root categories
    pub parent_id: Option<Uuid>,
    /// Whether the category is shown in storefront listings
    pub is_active: bool,
    /// Display ordering among siblings
    pub sort_order: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub parent_id: Option<Uuid>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

/// DTO for updating an existing category
///
/// `None` fields are left unchanged. `parent_id` distinguishes between
/// "not present" (unchanged) and explicit `null` (detach to root).
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>, nullable)]
    pub parent_id: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// A category with its descendants, as returned by the tree endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryNode {
    pub category: Category,
    #[schema(no_recursion)]
    pub children: Vec<CategoryNode>,
}

/// Brand entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Brand {
    /// Unique identifier
    pub id: Uuid,
    /// Brand name (unique among non-deleted brands)
    pub name: String,
    /// Brand description
    pub description: Option<String>,
    /// Logo image URL
    pub logo_url: Option<String>,
    /// Brand website URL
    pub website: Option<String>,
    /// Country of origin
    pub country: Option<String>,
    /// Whether the brand is shown in storefront listings
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new brand
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBrand {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(url)]
    pub logo_url: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// DTO for updating an existing brand
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBrand {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(url)]
    pub logo_url: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    pub is_active: Option<bool>,
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier
    pub id: Uuid,
    /// Product name
    pub name: String,
    /// Stock Keeping Unit (unique among non-deleted products)
    pub sku: String,
    /// Product description
    pub description: Option<String>,
    /// Owning category
    pub category_id: Uuid,
    /// Owning brand
    pub brand_id: Uuid,
    /// List price in cents
    pub price_cents: i64,
    /// Discounted price in cents, must be lower than `price_cents`
    pub discount_price_cents: Option<i64>,
    /// Current stock quantity
    pub stock_quantity: i32,
    /// Whether the product is purchasable; unavailable products are
    /// hidden from catalog listings but still reachable by id
    pub is_available: bool,
    /// Whether the product is featured in storefront promotions
    pub is_featured: bool,
    /// Average review rating on a 0-5 scale, `None` until first review
    pub average_rating: Option<f64>,
    /// Number of reviews behind `average_rating`
    pub review_count: i32,
    /// Comma-separated search tags
    pub tags: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub sku: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub category_id: Uuid,
    pub brand_id: Uuid,
    /// List price in cents
    #[validate(range(min = 1))]
    pub price_cents: i64,
    /// Discounted price in cents
    #[validate(range(min = 1))]
    pub discount_price_cents: Option<i64>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock_quantity: i32,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[validate(range(min = 0.0, max = 5.0))]
    pub average_rating: Option<f64>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub review_count: i32,
    #[serde(default)]
    pub tags: String,
}

/// DTO for updating an existing product
///
/// `None` fields are left unchanged. `discount_price_cents` distinguishes
/// between "not present" (unchanged) and explicit `null` (remove discount).
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub sku: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    #[validate(range(min = 1))]
    pub price_cents: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>, nullable)]
    pub discount_price_cents: Option<Option<i64>>,
    pub is_available: Option<bool>,
    pub is_featured: Option<bool>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub average_rating: Option<f64>,
    #[validate(range(min = 0))]
    pub review_count: Option<i32>,
    pub tags: Option<String>,
}

/// Query filters for listing products
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct ProductFilter {
    /// Filter by category
    pub category_id: Option<Uuid>,
    /// Filter by brand
    pub brand_id: Option<Uuid>,
    /// Case-insensitive search in name, description and tags
    pub search: Option<String>,
    /// Minimum list price (in cents, inclusive)
    pub min_price: Option<i64>,
    /// Maximum list price (in cents, inclusive)
    pub max_price: Option<i64>,
    /// `true` for products with stock, `false` for out-of-stock products
    pub in_stock: Option<bool>,
    /// Only featured products
    pub featured: Option<bool>,
    /// Minimum average rating; unrated products never match
    pub min_rating: Option<f64>,
    /// Sort field: `name`, `price`, `rating` or `date`
    pub sort_by: Option<String>,
    /// Sort direction: `asc` or `desc`
    pub sort_order: Option<String>,
    /// 1-based page number
    pub page: Option<u64>,
    /// Page size, clamped to 1..=100
    pub page_size: Option<u64>,
}

/// One page of products
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl ProductPage {
    pub fn new(items: Vec<Product>, page: u64, page_size: u64, total: u64) -> Self {
        Self {
            items,
            page,
            page_size,
            total,
            total_pages: total.div_ceil(page_size.max(1)),
        }
    }
}

/// Stock adjustment request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct StockAdjustment {
    /// Quantity to add (positive) or remove (negative)
    pub quantity: i32,
    /// Reason for adjustment
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// Absolute stock level request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct StockLevel {
    /// New stock quantity
    pub quantity: i32,
}

/// Customer review of a product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Review {
    /// Unique identifier
    pub id: Uuid,
    /// Reviewed product
    pub product_id: Uuid,
    /// Display name of the reviewer
    pub customer_name: String,
    /// Contact email, not shown in storefront listings
    pub customer_email: Option<String>,
    /// Star rating, 1 to 5
    pub rating: i32,
    /// Short headline
    pub title: Option<String>,
    /// Free-form review text
    pub comment: Option<String>,
    /// Submission timestamp
    pub created_at: DateTime<Utc>,
}

/// DTO for submitting a product review
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    #[validate(length(min = 1, max = 100))]
    pub customer_name: String,
    #[validate(email)]
    pub customer_email: Option<String>,
    /// Star rating, 1 to 5
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

impl Review {
    /// Create a new review from CreateReview DTO
    pub fn new(product_id: Uuid, input: CreateReview) -> Self {
        Self {
            id: Uuid::now_v7(),
            product_id,
            customer_name: input.customer_name,
            customer_email: input.customer_email,
            rating: input.rating,
            title: input.title,
            comment: input.comment,
            created_at: Utc::now(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Deserializes a field so that a missing key yields `None` while an
/// explicit `null` yields `Some(None)`.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

impl Category {
    /// Create a new category from CreateCategory DTO
    pub fn new(input: CreateCategory) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            image_url: input.image_url,
            parent_id: input.parent_id,
            is_active: input.is_active,
            sort_order: input.sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates from UpdateCategory DTO
    pub fn apply_update(&mut self, update: UpdateCategory) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(image_url) = update.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(parent_id) = update.parent_id {
            self.parent_id = parent_id;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        if let Some(sort_order) = update.sort_order {
            self.sort_order = sort_order;
        }
        self.updated_at = Utc::now();
    }
}

impl Brand {
    /// Create a new brand from CreateBrand DTO
    pub fn new(input: CreateBrand) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            logo_url: input.logo_url,
            website: input.website,
            country: input.country,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates from UpdateBrand DTO
    pub fn apply_update(&mut self, update: UpdateBrand) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(logo_url) = update.logo_url {
            self.logo_url = Some(logo_url);
        }
        if let Some(website) = update.website {
            self.website = Some(website);
        }
        if let Some(country) = update.country {
            self.country = Some(country);
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();
    }
}

impl Product {
    /// Create a new product from CreateProduct DTO
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            sku: input.sku,
            description: input.description,
            category_id: input.category_id,
            brand_id: input.brand_id,
            price_cents: input.price_cents,
            discount_price_cents: input.discount_price_cents,
            stock_quantity: input.stock_quantity,
            is_available: input.is_available,
            is_featured: input.is_featured,
            average_rating: input.average_rating,
            review_count: input.review_count,
            tags: input.tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates from UpdateProduct DTO
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(sku) = update.sku {
            self.sku = sku;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(brand_id) = update.brand_id {
            self.brand_id = brand_id;
        }
        if let Some(price_cents) = update.price_cents {
            self.price_cents = price_cents;
        }
        if let Some(discount) = update.discount_price_cents {
            self.discount_price_cents = discount;
        }
        if let Some(is_available) = update.is_available {
            self.is_available = is_available;
        }
        if let Some(is_featured) = update.is_featured {
            self.is_featured = is_featured;
        }
        if let Some(average_rating) = update.average_rating {
            self.average_rating = Some(average_rating);
        }
        if let Some(review_count) = update.review_count {
            self.review_count = review_count;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        self.updated_at = Utc::now();
    }

    /// Check if product has stock on hand
    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}
