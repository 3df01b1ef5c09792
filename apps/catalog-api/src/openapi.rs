//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Catalog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Product catalog API: categories, brands, products and stock",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    nest(
        (path = "/api/categories", api = domain_catalog::CategoriesApiDoc),
        (path = "/api/brands", api = domain_catalog::BrandsApiDoc),
        (path = "/api/products", api = domain_catalog::ProductsApiDoc)
    )
)]
pub struct ApiDoc;
