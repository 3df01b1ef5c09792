//! Category hierarchy rules: parent assignment and deletion guards.

use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::repository::{CategoryRepository, ProductRepository};

/// Validate that `proposed_parent_id` is a legal parent for `category_id`.
///
/// Rejects self-parenting, dangling parents and any assignment that
/// would close a cycle. The ancestor walk is bounded by the category
/// count so a corrupt chain cannot loop forever.
pub async fn validate_parent_assignment<R>(
    repo: &R,
    category_id: Uuid,
    proposed_parent_id: Uuid,
) -> CatalogResult<()>
where
    R: CategoryRepository + ?Sized,
{
    if proposed_parent_id == category_id {
        return Err(CatalogError::SelfReference);
    }

    let parent = repo
        .get_by_id(proposed_parent_id)
        .await?
        .ok_or(CatalogError::InvalidReference {
            entity: "category",
            id: proposed_parent_id,
        })?;

    let bound = repo.count().await?;
    let mut current = parent;
    let mut steps: u64 = 0;
    while let Some(ancestor_id) = current.parent_id {
        if ancestor_id == category_id {
            return Err(CatalogError::CircularReference(category_id));
        }
        steps += 1;
        if steps > bound {
            return Err(CatalogError::CircularReference(category_id));
        }
        match repo.get_by_id(ancestor_id).await? {
            Some(ancestor) => current = ancestor,
            // Chain ends at a deleted ancestor; no cycle possible past it
            None => break,
        }
    }

    Ok(())
}

/// Validate that a category can be soft-deleted.
///
/// Deletion is blocked while the category still has subcategories or
/// products.
pub async fn validate_deletable<C, P>(
    categories: &C,
    products: &P,
    category_id: Uuid,
) -> CatalogResult<()>
where
    C: CategoryRepository + ?Sized,
    P: ProductRepository + ?Sized,
{
    if categories.count_children(category_id).await? > 0 {
        return Err(CatalogError::HasChildren(category_id));
    }
    if products.count_by_category(category_id).await? > 0 {
        return Err(CatalogError::HasProducts {
            entity: "Category",
            id: category_id,
        });
    }
    Ok(())
}

/// Validate that a category name is not already taken.
///
/// Comparison is case-insensitive and ignores soft-deleted rows. Pass
/// `excluding` on update so a category can keep its own name.
pub async fn validate_unique_name<R>(
    repo: &R,
    name: &str,
    excluding: Option<Uuid>,
) -> CatalogResult<()>
where
    R: CategoryRepository + ?Sized,
{
    if let Some(existing) = repo.find_by_name(name).await? {
        if Some(existing.id) != excluding {
            return Err(CatalogError::DuplicateName(name.to_string()));
        }
    }
    Ok(())
}
