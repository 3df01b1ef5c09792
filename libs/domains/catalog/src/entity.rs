//! Sea-ORM entities for the catalog tables.
//!
//! Schema lives in `schema.sql` next to this crate. Soft deletes are a
//! `is_deleted` flag; repositories filter it on every query so the flag
//! never leaks into the domain models.

pub mod category {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::Set;
    use serde::{Deserialize, Serialize};

    /// Sea-ORM Entity for the categories table
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "categories")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        #[sea_orm(column_type = "Text", nullable)]
        pub description: Option<String>,
        #[sea_orm(column_type = "Text", nullable)]
        pub image_url: Option<String>,
        pub parent_id: Option<Uuid>,
        pub is_active: bool,
        pub sort_order: i32,
        pub is_deleted: bool,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Category {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                name: model.name,
                description: model.description,
                image_url: model.image_url,
                parent_id: model.parent_id,
                is_active: model.is_active,
                sort_order: model.sort_order,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl From<crate::models::CreateCategory> for ActiveModel {
        fn from(input: crate::models::CreateCategory) -> Self {
            let now = chrono::Utc::now();
            ActiveModel {
                id: Set(Uuid::now_v7()),
                name: Set(input.name),
                description: Set(input.description),
                image_url: Set(input.image_url),
                parent_id: Set(input.parent_id),
                is_active: Set(input.is_active),
                sort_order: Set(input.sort_order),
                is_deleted: Set(false),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
        }
    }
}

pub mod brand {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::Set;
    use serde::{Deserialize, Serialize};

    /// Sea-ORM Entity for the brands table
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "brands")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        #[sea_orm(column_type = "Text", nullable)]
        pub description: Option<String>,
        #[sea_orm(column_type = "Text", nullable)]
        pub logo_url: Option<String>,
        #[sea_orm(column_type = "Text", nullable)]
        pub website: Option<String>,
        pub country: Option<String>,
        pub is_active: bool,
        pub is_deleted: bool,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Brand {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                name: model.name,
                description: model.description,
                logo_url: model.logo_url,
                website: model.website,
                country: model.country,
                is_active: model.is_active,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl From<crate::models::CreateBrand> for ActiveModel {
        fn from(input: crate::models::CreateBrand) -> Self {
            let now = chrono::Utc::now();
            ActiveModel {
                id: Set(Uuid::now_v7()),
                name: Set(input.name),
                description: Set(input.description),
                logo_url: Set(input.logo_url),
                website: Set(input.website),
                country: Set(input.country),
                is_active: Set(input.is_active),
                is_deleted: Set(false),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
        }
    }
}

pub mod product {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::Set;
    use serde::{Deserialize, Serialize};

    /// Sea-ORM Entity for the products table
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "products")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        pub sku: String,
        #[sea_orm(column_type = "Text", nullable)]
        pub description: Option<String>,
        pub category_id: Uuid,
        pub brand_id: Uuid,
        pub price_cents: i64,
        pub discount_price_cents: Option<i64>,
        pub stock_quantity: i32,
        pub is_available: bool,
        pub is_featured: bool,
        pub average_rating: Option<f64>,
        pub review_count: i32,
        #[sea_orm(column_type = "Text")]
        pub tags: String,
        pub is_deleted: bool,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Product {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                name: model.name,
                sku: model.sku,
                description: model.description,
                category_id: model.category_id,
                brand_id: model.brand_id,
                price_cents: model.price_cents,
                discount_price_cents: model.discount_price_cents,
                stock_quantity: model.stock_quantity,
                is_available: model.is_available,
                is_featured: model.is_featured,
                average_rating: model.average_rating,
                review_count: model.review_count,
                tags: model.tags,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl From<crate::models::CreateProduct> for ActiveModel {
        fn from(input: crate::models::CreateProduct) -> Self {
            let now = chrono::Utc::now();
            ActiveModel {
                id: Set(Uuid::now_v7()),
                name: Set(input.name),
                sku: Set(input.sku),
                description: Set(input.description),
                category_id: Set(input.category_id),
                brand_id: Set(input.brand_id),
                price_cents: Set(input.price_cents),
                discount_price_cents: Set(input.discount_price_cents),
                stock_quantity: Set(input.stock_quantity),
                is_available: Set(input.is_available),
                is_featured: Set(input.is_featured),
                average_rating: Set(input.average_rating),
                review_count: Set(input.review_count),
                tags: Set(input.tags),
                is_deleted: Set(false),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
        }
    }
}

pub mod review {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::Set;
    use serde::{Deserialize, Serialize};

    /// Sea-ORM Entity for the product_reviews table
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "product_reviews")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub product_id: Uuid,
        pub customer_name: String,
        pub customer_email: Option<String>,
        pub rating: i32,
        pub title: Option<String>,
        #[sea_orm(column_type = "Text", nullable)]
        pub comment: Option<String>,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Review {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                product_id: model.product_id,
                customer_name: model.customer_name,
                customer_email: model.customer_email,
                rating: model.rating,
                title: model.title,
                comment: model.comment,
                created_at: model.created_at.into(),
            }
        }
    }

    impl From<crate::models::Review> for ActiveModel {
        fn from(review: crate::models::Review) -> Self {
            ActiveModel {
                id: Set(review.id),
                product_id: Set(review.product_id),
                customer_name: Set(review.customer_name),
                customer_email: Set(review.customer_email),
                rating: Set(review.rating),
                title: Set(review.title),
                comment: Set(review.comment),
                created_at: Set(review.created_at.into()),
            }
        }
    }
}
