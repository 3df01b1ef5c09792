//! Pure product listing engine: filter, sort and paginate in memory.
//!
//! The Postgres repository pushes the same semantics down to SQL; the
//! in-memory repository runs this module directly. Keeping the rules in
//! one testable place is what lets both agree on edge cases.

use std::cmp::Ordering;

use strum::EnumString;

use crate::models::{Product, ProductFilter, ProductPage};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Sort field for product listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SortField {
    #[default]
    Name,
    Price,
    Rating,
    Date,
}

/// Sort direction for product listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Resolve the sort field and direction from a filter.
///
/// Unrecognized values fall back to the defaults (name ascending)
/// rather than failing the request.
pub fn sort_spec(filter: &ProductFilter) -> (SortField, SortDirection) {
    let field = filter
        .sort_by
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();
    let direction = filter
        .sort_order
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();
    (field, direction)
}

/// Resolve page and page size from a filter.
///
/// Page is 1-based with a floor of 1; page size defaults to
/// [`DEFAULT_PAGE_SIZE`] and is clamped to `1..=MAX_PAGE_SIZE`.
pub fn normalize_page(filter: &ProductFilter) -> (u64, u64) {
    let page = filter.page.unwrap_or(1).max(1);
    let page_size = filter
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    (page, page_size)
}

/// Whether a product matches every supplied filter.
///
/// Filters are ANDed. Unavailable products never match; price bounds
/// apply to the list price (discounts are ignored) and are inclusive;
/// unrated products never satisfy `min_rating`.
pub fn matches(product: &Product, filter: &ProductFilter) -> bool {
    if !product.is_available {
        return false;
    }
    if let Some(category_id) = filter.category_id {
        if product.category_id != category_id {
            return false;
        }
    }
    if let Some(brand_id) = filter.brand_id {
        if product.brand_id != brand_id {
            return false;
        }
    }
    if let Some(ref search) = filter.search {
        let needle = search.to_lowercase();
        let in_name = product.name.to_lowercase().contains(&needle);
        let in_description = product
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle));
        let in_tags = product.tags.to_lowercase().contains(&needle);
        if !(in_name || in_description || in_tags) {
            return false;
        }
    }
    if let Some(min_price) = filter.min_price {
        if product.price_cents < min_price {
            return false;
        }
    }
    if let Some(max_price) = filter.max_price {
        if product.price_cents > max_price {
            return false;
        }
    }
    if let Some(in_stock) = filter.in_stock {
        if product.is_in_stock() != in_stock {
            return false;
        }
    }
    if let Some(featured) = filter.featured {
        if product.is_featured != featured {
            return false;
        }
    }
    if let Some(min_rating) = filter.min_rating {
        match product.average_rating {
            Some(rating) if rating >= min_rating => {}
            _ => return false,
        }
    }
    true
}

/// Compare two products under a sort specification.
pub fn compare(
    a: &Product,
    b: &Product,
    field: SortField,
    direction: SortDirection,
) -> Ordering {
    let ordering = match field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Price => a.price_cents.cmp(&b.price_cents),
        // None sorts below any rating
        SortField::Rating => a
            .average_rating
            .partial_cmp(&b.average_rating)
            .unwrap_or(Ordering::Equal),
        SortField::Date => a.created_at.cmp(&b.created_at),
    };
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Run the full listing pipeline over a product set.
///
/// The total count is taken after filtering but before pagination, so
/// an out-of-range page returns an empty page with the true total.
pub fn run<I>(products: I, filter: &ProductFilter) -> ProductPage
where
    I: IntoIterator<Item = Product>,
{
    let (field, direction) = sort_spec(filter);
    let (page, page_size) = normalize_page(filter);

    let mut matched: Vec<Product> = products
        .into_iter()
        .filter(|p| matches(p, filter))
        .collect();
    let total = matched.len() as u64;

    matched.sort_by(|a, b| compare(a, b, field, direction));

    let items: Vec<Product> = matched
        .into_iter()
        .skip(page.saturating_sub(1).saturating_mul(page_size) as usize)
        .take(page_size as usize)
        .collect();

    ProductPage::new(items, page, page_size, total)
}
