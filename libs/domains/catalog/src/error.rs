use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    #[error("Brand not found: {0}")]
    BrandNotFound(Uuid),

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Product with SKU '{0}' not found")]
    SkuNotFound(String),

    #[error("Name '{0}' is already in use")]
    DuplicateName(String),

    #[error("SKU '{0}' is already in use")]
    DuplicateSku(String),

    #[error("Referenced {entity} {id} does not exist")]
    InvalidReference { entity: &'static str, id: Uuid },

    #[error("A category cannot be its own parent")]
    SelfReference,

    #[error("Moving category {0} under the requested parent would create a cycle")]
    CircularReference(Uuid),

    #[error("Category {0} still has subcategories")]
    HasChildren(Uuid),

    #[error("{entity} {id} still has products")]
    HasProducts { entity: &'static str, id: Uuid },

    #[error("Discount price {discount_cents} must be lower than price {price_cents}")]
    InvalidPriceRelationship { price_cents: i64, discount_cents: i64 },

    #[error("Stock cannot go negative: current {current}, requested change {requested}")]
    NegativeStock { current: i32, requested: i32 },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        CatalogError::Database(err.to_string())
    }
}

/// Convert CatalogError to AppError for standardized error responses
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CategoryNotFound(_)
            | CatalogError::BrandNotFound(_)
            | CatalogError::ProductNotFound(_)
            | CatalogError::SkuNotFound(_) => AppError::NotFound(err.to_string()),
            CatalogError::DuplicateName(_)
            | CatalogError::DuplicateSku(_)
            | CatalogError::SelfReference
            | CatalogError::CircularReference(_)
            | CatalogError::HasChildren(_)
            | CatalogError::HasProducts { .. } => AppError::Conflict(err.to_string()),
            CatalogError::InvalidReference { .. }
            | CatalogError::InvalidPriceRelationship { .. }
            | CatalogError::NegativeStock { .. } => AppError::UnprocessableEntity(err.to_string()),
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        // Convert to AppError for standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = CatalogError::ProductNotFound(Uuid::now_v7()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflicts_map_to_409() {
        let id = Uuid::now_v7();
        for err in [
            CatalogError::DuplicateName("CPUs".to_string()),
            CatalogError::DuplicateSku("KB-001".to_string()),
            CatalogError::SelfReference,
            CatalogError::CircularReference(id),
            CatalogError::HasChildren(id),
            CatalogError::HasProducts {
                entity: "Category",
                id,
            },
        ] {
            assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn test_semantic_failures_map_to_422() {
        let err = CatalogError::InvalidPriceRelationship {
            price_cents: 100,
            discount_cents: 100,
        };
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let err = CatalogError::NegativeStock {
            current: 2,
            requested: -5,
        };
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
