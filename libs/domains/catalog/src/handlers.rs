use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, UnprocessableEntityResponse,
    },
    UuidPath, ValidatedJson,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};

use crate::error::CatalogResult;
use crate::models::{
    Brand, Category, CategoryNode, CreateBrand, CreateCategory, CreateProduct, CreateReview,
    Product, ProductFilter, ProductPage, Review, StockAdjustment, StockLevel, UpdateBrand,
    UpdateCategory, UpdateProduct,
};
use crate::repository::{BrandRepository, CategoryRepository, ProductRepository};
use crate::service::{BrandService, CategoryService, ProductService};

const CATEGORIES_TAG: &str = "categories";
const BRANDS_TAG: &str = "brands";
const PRODUCTS_TAG: &str = "products";

/// OpenAPI documentation for category endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        category_tree,
        get_category,
        update_category,
        delete_category,
        subcategories,
    ),
    components(
        schemas(Category, CategoryNode, CreateCategory, UpdateCategory),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            UnprocessableEntityResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = CATEGORIES_TAG, description = "Category hierarchy endpoints")
    )
)]
pub struct CategoriesApiDoc;

/// OpenAPI documentation for brand endpoints
#[derive(OpenApi)]
#[openapi(
    paths(list_brands, create_brand, get_brand, update_brand, delete_brand),
    components(
        schemas(Brand, CreateBrand, UpdateBrand),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = BRANDS_TAG, description = "Brand management endpoints")
    )
)]
pub struct BrandsApiDoc;

/// OpenAPI documentation for product endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        get_product_by_sku,
        update_product,
        delete_product,
        adjust_stock,
        set_stock,
        list_product_reviews,
        create_product_review,
    ),
    components(
        schemas(
            Product,
            ProductPage,
            CreateProduct,
            UpdateProduct,
            ProductFilter,
            StockAdjustment,
            StockLevel,
            Review,
            CreateReview,
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            UnprocessableEntityResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = PRODUCTS_TAG, description = "Product and stock endpoints")
    )
)]
pub struct ProductsApiDoc;

/// Query options for list endpoints
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Include inactive entries
    #[serde(default)]
    pub include_inactive: bool,
}

/// Create the category router with all HTTP endpoints
pub fn categories_router<C, P>(service: CategoryService<C, P>) -> Router
where
    C: CategoryRepository + 'static,
    P: ProductRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/tree", get(category_tree))
        .route(
            "/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/{id}/subcategories", get(subcategories))
        .with_state(shared_service)
}

/// Create the brand router with all HTTP endpoints
pub fn brands_router<B, P>(service: BrandService<B, P>) -> Router
where
    B: BrandRepository + 'static,
    P: ProductRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_brands).post(create_brand))
        .route("/{id}", get(get_brand).put(update_brand).delete(delete_brand))
        .with_state(shared_service)
}

/// Create the product router with all HTTP endpoints
pub fn products_router<P, C, B>(service: ProductService<P, C, B>) -> Router
where
    P: ProductRepository + 'static,
    C: CategoryRepository + 'static,
    B: BrandRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/sku/{sku}", get(get_product_by_sku))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/stock", post(adjust_stock).put(set_stock))
        .route(
            "/{id}/reviews",
            get(list_product_reviews).post(create_product_review),
        )
        .with_state(shared_service)
}

/// List categories
#[utoipa::path(
    get,
    path = "",
    tag = CATEGORIES_TAG,
    params(ListQuery),
    responses(
        (status = 200, description = "List of categories", body = Vec<Category>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<C: CategoryRepository, P: ProductRepository>(
    State(service): State<Arc<CategoryService<C, P>>>,
    Query(query): Query<ListQuery>,
) -> CatalogResult<Json<Vec<Category>>> {
    let categories = service.list_categories(query.include_inactive).await?;
    Ok(Json(categories))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "",
    tag = CATEGORIES_TAG,
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created successfully", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<C: CategoryRepository, P: ProductRepository>(
    State(service): State<Arc<CategoryService<C, P>>>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CatalogResult<impl IntoResponse> {
    let category = service.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Get the category tree
#[utoipa::path(
    get,
    path = "/tree",
    tag = CATEGORIES_TAG,
    responses(
        (status = 200, description = "Active categories arranged as trees", body = Vec<CategoryNode>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn category_tree<C: CategoryRepository, P: ProductRepository>(
    State(service): State<Arc<CategoryService<C, P>>>,
) -> CatalogResult<Json<Vec<CategoryNode>>> {
    let tree = service.category_tree().await?;
    Ok(Json(tree))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = CATEGORIES_TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<C: CategoryRepository, P: ProductRepository>(
    State(service): State<Arc<CategoryService<C, P>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Category>> {
    let category = service.get_category(id).await?;
    Ok(Json(category))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/{id}",
    tag = CATEGORIES_TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated successfully", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<C: CategoryRepository, P: ProductRepository>(
    State(service): State<Arc<CategoryService<C, P>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> CatalogResult<Json<Category>> {
    let category = service.update_category(id, input).await?;
    Ok(Json(category))
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = CATEGORIES_TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<C: CategoryRepository, P: ProductRepository>(
    State(service): State<Arc<CategoryService<C, P>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<impl IntoResponse> {
    service.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List direct subcategories of a category
#[utoipa::path(
    get,
    path = "/{id}/subcategories",
    tag = CATEGORIES_TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Direct subcategories", body = Vec<Category>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn subcategories<C: CategoryRepository, P: ProductRepository>(
    State(service): State<Arc<CategoryService<C, P>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Vec<Category>>> {
    let children = service.subcategories(id).await?;
    Ok(Json(children))
}

/// List brands
#[utoipa::path(
    get,
    path = "",
    tag = BRANDS_TAG,
    params(ListQuery),
    responses(
        (status = 200, description = "List of brands", body = Vec<Brand>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_brands<B: BrandRepository, P: ProductRepository>(
    State(service): State<Arc<BrandService<B, P>>>,
    Query(query): Query<ListQuery>,
) -> CatalogResult<Json<Vec<Brand>>> {
    let brands = service.list_brands(query.include_inactive).await?;
    Ok(Json(brands))
}

/// Create a new brand
#[utoipa::path(
    post,
    path = "",
    tag = BRANDS_TAG,
    request_body = CreateBrand,
    responses(
        (status = 201, description = "Brand created successfully", body = Brand),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_brand<B: BrandRepository, P: ProductRepository>(
    State(service): State<Arc<BrandService<B, P>>>,
    ValidatedJson(input): ValidatedJson<CreateBrand>,
) -> CatalogResult<impl IntoResponse> {
    let brand = service.create_brand(input).await?;
    Ok((StatusCode::CREATED, Json(brand)))
}

/// Get a brand by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = BRANDS_TAG,
    params(
        ("id" = Uuid, Path, description = "Brand ID")
    ),
    responses(
        (status = 200, description = "Brand found", body = Brand),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_brand<B: BrandRepository, P: ProductRepository>(
    State(service): State<Arc<BrandService<B, P>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Brand>> {
    let brand = service.get_brand(id).await?;
    Ok(Json(brand))
}

/// Update a brand
#[utoipa::path(
    put,
    path = "/{id}",
    tag = BRANDS_TAG,
    params(
        ("id" = Uuid, Path, description = "Brand ID")
    ),
    request_body = UpdateBrand,
    responses(
        (status = 200, description = "Brand updated successfully", body = Brand),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_brand<B: BrandRepository, P: ProductRepository>(
    State(service): State<Arc<BrandService<B, P>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateBrand>,
) -> CatalogResult<Json<Brand>> {
    let brand = service.update_brand(id, input).await?;
    Ok(Json(brand))
}

/// Delete a brand
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = BRANDS_TAG,
    params(
        ("id" = Uuid, Path, description = "Brand ID")
    ),
    responses(
        (status = 204, description = "Brand deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_brand<B: BrandRepository, P: ProductRepository>(
    State(service): State<Arc<BrandService<B, P>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<impl IntoResponse> {
    service.delete_brand(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List products with filtering, sorting and pagination
#[utoipa::path(
    get,
    path = "",
    tag = PRODUCTS_TAG,
    params(ProductFilter),
    responses(
        (status = 200, description = "One page of matching products", body = ProductPage),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<P: ProductRepository, C: CategoryRepository, B: BrandRepository>(
    State(service): State<Arc<ProductService<P, C, B>>>,
    Query(filter): Query<ProductFilter>,
) -> CatalogResult<Json<ProductPage>> {
    let page = service.list_products(filter).await?;
    Ok(Json(page))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = PRODUCTS_TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<P: ProductRepository, C: CategoryRepository, B: BrandRepository>(
    State(service): State<Arc<ProductService<P, C, B>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> CatalogResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = PRODUCTS_TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<P: ProductRepository, C: CategoryRepository, B: BrandRepository>(
    State(service): State<Arc<ProductService<P, C, B>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Get a product by SKU
#[utoipa::path(
    get,
    path = "/sku/{sku}",
    tag = PRODUCTS_TAG,
    params(
        ("sku" = String, Path, description = "Product SKU")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product_by_sku<P: ProductRepository, C: CategoryRepository, B: BrandRepository>(
    State(service): State<Arc<ProductService<P, C, B>>>,
    Path(sku): Path<String>,
) -> CatalogResult<Json<Product>> {
    let product = service.get_by_sku(&sku).await?;
    Ok(Json(product))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = PRODUCTS_TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<P: ProductRepository, C: CategoryRepository, B: BrandRepository>(
    State(service): State<Arc<ProductService<P, C, B>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> CatalogResult<Json<Product>> {
    let product = service.update_product(id, input).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = PRODUCTS_TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<P: ProductRepository, C: CategoryRepository, B: BrandRepository>(
    State(service): State<Arc<ProductService<P, C, B>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<impl IntoResponse> {
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Adjust product stock by a delta
#[utoipa::path(
    post,
    path = "/{id}/stock",
    tag = PRODUCTS_TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = StockAdjustment,
    responses(
        (status = 200, description = "Stock adjusted successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn adjust_stock<P: ProductRepository, C: CategoryRepository, B: BrandRepository>(
    State(service): State<Arc<ProductService<P, C, B>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<StockAdjustment>,
) -> CatalogResult<Json<Product>> {
    let product = service.adjust_stock(id, input).await?;
    Ok(Json(product))
}

/// Set the absolute stock quantity
#[utoipa::path(
    put,
    path = "/{id}/stock",
    tag = PRODUCTS_TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = StockLevel,
    responses(
        (status = 200, description = "Stock level set successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn set_stock<P: ProductRepository, C: CategoryRepository, B: BrandRepository>(
    State(service): State<Arc<ProductService<P, C, B>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<StockLevel>,
) -> CatalogResult<Json<Product>> {
    let product = service.set_stock(id, input).await?;
    Ok(Json(product))
}

/// List reviews for a product, newest first
#[utoipa::path(
    get,
    path = "/{id}/reviews",
    tag = PRODUCTS_TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Reviews for the product", body = Vec<Review>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_product_reviews<P: ProductRepository, C: CategoryRepository, B: BrandRepository>(
    State(service): State<Arc<ProductService<P, C, B>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Vec<Review>>> {
    let reviews = service.list_reviews(id).await?;
    Ok(Json(reviews))
}

/// Submit a review for a product
#[utoipa::path(
    post,
    path = "/{id}/reviews",
    tag = PRODUCTS_TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created successfully", body = Review),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product_review<P: ProductRepository, C: CategoryRepository, B: BrandRepository>(
    State(service): State<Arc<ProductService<P, C, B>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<CreateReview>,
) -> CatalogResult<impl IntoResponse> {
    let review = service.add_review(id, input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}
