use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;
use validator::Validate;

/// Rating above which a product is always featured
pub const FEATURED_RATING_THRESHOLD: f64 = 8.0;

/// Manufacturer a product belongs to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    /// `0` for a brand that is not stored yet
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}

/// Classification tag. Ordered by id, then name.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, ToSchema,
)]
pub struct Category {
    /// `0` for a category that is not stored yet
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Catalog product
///
/// `featured` is forced to `true` whenever `rating > 8`. The flag and the
/// rating are only reachable through accessors so every write path
/// (construction, JSON decoding, [`Product::update`]) keeps that invariant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", from = "ProductPayload")]
pub struct Product {
    /// Store-assigned identifier, `0` until saved
    pub id: i32,
    #[validate(length(min = 1, max = 255, message = "Product name must have length from 1 to 255."))]
    pub name: String,
    featured: bool,
    /// Must lie more than 30 days in the future when validated
    #[schema(example = "2030-01-01T00:00:00Z")]
    pub expiration_date: Option<DateTime<Utc>>,
    pub items_in_stock: i32,
    pub receipt_date: Option<DateTime<Utc>>,
    rating: f64,
    #[validate(required(message = "A product must have brand."))]
    pub brand: Option<Brand>,
    #[validate(
        required(message = "A product must have categories."),
        length(min = 1, max = 5, message = "A product must have from 1 to 5 categories.")
    )]
    pub categories: Option<BTreeSet<Category>>,
}

impl Product {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn featured(&self) -> bool {
        self.featured
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// Stores `featured`, unless the rating already forces it on.
    pub fn set_featured(&mut self, featured: bool) {
        self.featured = self.rating > FEATURED_RATING_THRESHOLD || featured;
    }

    pub fn set_rating(&mut self, rating: f64) {
        self.rating = rating;
        self.set_featured(self.featured);
    }

    /// Copies every field except `id` from `source`, then reapplies the
    /// featured rule against the copied rating.
    pub fn update(&mut self, source: &Product) {
        self.name = source.name.clone();
        self.expiration_date = source.expiration_date;
        self.items_in_stock = source.items_in_stock;
        self.receipt_date = source.receipt_date;
        self.rating = source.rating;
        self.brand = source.brand.clone();
        self.categories = source.categories.clone();
        self.set_featured(source.featured);
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.set_rating(rating);
        self
    }

    pub fn with_featured(mut self, featured: bool) -> Self {
        self.set_featured(featured);
        self
    }

    pub fn with_brand(mut self, brand: Brand) -> Self {
        self.brand = Some(brand);
        self
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }
}

/// Wire shape of [`Product`]; missing fields fall back to their defaults
/// and the featured rule is applied on conversion.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProductPayload {
    #[serde(deserialize_with = "null_as_default")]
    id: i32,
    #[serde(deserialize_with = "null_as_default")]
    name: String,
    #[serde(deserialize_with = "null_as_default")]
    featured: bool,
    expiration_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    items_in_stock: i32,
    receipt_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    rating: f64,
    brand: Option<Brand>,
    categories: Option<BTreeSet<Category>>,
}

/// Reads an explicit `null` as the type's default, so it reaches validation
/// instead of failing to decode.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<ProductPayload> for Product {
    fn from(payload: ProductPayload) -> Self {
        let mut product = Product {
            id: payload.id,
            name: payload.name,
            featured: false,
            expiration_date: payload.expiration_date,
            items_in_stock: payload.items_in_stock,
            receipt_date: payload.receipt_date,
            rating: payload.rating,
            brand: payload.brand,
            categories: payload.categories,
        };
        product.set_featured(payload.featured);
        product
    }
}
