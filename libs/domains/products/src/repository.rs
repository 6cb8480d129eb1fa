use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{Brand, Category, Product};

/// Repository trait for Product persistence
///
/// Brands and categories are saved along with the product that references
/// them: an id of `0` or an unknown id stores a new record, a known id
/// overwrites the stored fields.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products, ordered by id
    async fn find_all(&self) -> ProductResult<Vec<Product>>;

    async fn find_by_id(&self, id: i32) -> ProductResult<Option<Product>>;

    /// Inserts when `product.id` is `0` or unknown, otherwise overwrites.
    /// Returns the product as stored, with every id assigned.
    async fn save(&self, product: Product) -> ProductResult<Product>;

    /// Fails with [`ProductError::NotFound`] when no product has `id`
    async fn delete_by_id(&self, id: i32) -> ProductResult<()>;
}

#[derive(Debug, Default)]
struct Store {
    products: BTreeMap<i32, Product>,
    brands: BTreeMap<i32, Brand>,
    categories: BTreeMap<i32, Category>,
    last_product_id: i32,
    last_brand_id: i32,
    last_category_id: i32,
}

impl Store {
    fn save_brand(&mut self, mut brand: Brand) -> Brand {
        if !self.brands.contains_key(&brand.id) {
            self.last_brand_id += 1;
            brand.id = self.last_brand_id;
        }
        self.brands.insert(brand.id, brand.clone());
        brand
    }

    fn save_category(&mut self, mut category: Category) -> Category {
        if !self.categories.contains_key(&category.id) {
            self.last_category_id += 1;
            category.id = self.last_category_id;
        }
        self.categories.insert(category.id, category.clone());
        category
    }

    /// Re-reads brand and categories so merges made through other products show up
    fn resolve(&self, product: &Product) -> Product {
        let mut resolved = product.clone();
        resolved.brand = product
            .brand
            .as_ref()
            .and_then(|b| self.brands.get(&b.id).cloned());
        resolved.categories = product.categories.as_ref().map(|categories| {
            categories
                .iter()
                .filter_map(|c| self.categories.get(&c.id).cloned())
                .collect()
        });
        resolved
    }
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> ProductResult<Vec<Product>> {
        let store = self.store.read().await;
        Ok(store.products.values().map(|p| store.resolve(p)).collect())
    }

    async fn find_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let store = self.store.read().await;
        Ok(store.products.get(&id).map(|p| store.resolve(p)))
    }

    async fn save(&self, mut product: Product) -> ProductResult<Product> {
        let mut store = self.store.write().await;

        product.brand = product.brand.map(|brand| store.save_brand(brand));
        // One entry per category id; a later entry with the same id wins
        product.categories = product.categories.map(|categories| {
            categories
                .into_iter()
                .map(|category| {
                    let saved = store.save_category(category);
                    (saved.id, saved)
                })
                .collect::<BTreeMap<_, _>>()
                .into_values()
                .collect::<BTreeSet<_>>()
        });

        if !store.products.contains_key(&product.id) {
            store.last_product_id += 1;
            product.id = store.last_product_id;
            tracing::info!(product_id = %product.id, "Created product");
        } else {
            tracing::info!(product_id = %product.id, "Updated product");
        }

        store.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete_by_id(&self, id: i32) -> ProductResult<()> {
        let mut store = self.store.write().await;

        match store.products.remove(&id) {
            Some(_) => {
                tracing::info!(product_id = %id, "Deleted product");
                Ok(())
            }
            None => Err(ProductError::NotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brand(id: i32, name: &str) -> Brand {
        Brand {
            id,
            name: name.to_string(),
            country: None,
        }
    }

    fn category(id: i32, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
        }
    }

    fn new_product(name: &str) -> Product {
        Product::new(name)
            .with_brand(brand(0, "Acme"))
            .with_categories([category(0, "Tools"), category(0, "Garden")])
    }

    #[tokio::test]
    async fn test_save_assigns_ids_and_get() {
        let repo = InMemoryProductRepository::new();

        let saved = repo.save(new_product("Rake")).await.unwrap();
        assert_eq!(saved.id, 1);
        assert_eq!(saved.brand.as_ref().map(|b| b.id), Some(1));

        let ids: Vec<i32> = saved
            .categories
            .as_ref()
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.iter().all(|id| *id > 0));

        let fetched = repo.find_by_id(saved.id).await.unwrap();
        assert_eq!(fetched, Some(saved));
    }

    #[tokio::test]
    async fn test_save_existing_overwrites() {
        let repo = InMemoryProductRepository::new();
        let mut saved = repo.save(new_product("Rake")).await.unwrap();

        saved.name = "Leaf rake".to_string();
        saved.items_in_stock = 4;
        let updated = repo.save(saved.clone()).await.unwrap();

        assert_eq!(updated.id, saved.id);
        assert_eq!(repo.find_all().await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn test_save_unknown_id_inserts() {
        let repo = InMemoryProductRepository::new();
        let mut product = new_product("Hoe");
        product.id = 42;

        let saved = repo.save(product).await.unwrap();
        assert_eq!(saved.id, 1);
        assert!(repo.find_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_known_brand_is_merged_for_every_product() {
        let repo = InMemoryProductRepository::new();
        let first = repo.save(new_product("Rake")).await.unwrap();
        let brand_id = first.brand.as_ref().unwrap().id;

        let second = new_product("Shovel").with_brand(brand(brand_id, "Acme Tools"));
        repo.save(second).await.unwrap();

        let first = repo.find_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(first.brand.unwrap().name, "Acme Tools");
    }

    #[tokio::test]
    async fn test_duplicate_category_id_is_stored_once() {
        let repo = InMemoryProductRepository::new();
        let first = repo.save(new_product("Rake")).await.unwrap();
        let category_id = first.categories.as_ref().unwrap().iter().next().unwrap().id;

        let product = new_product("Shovel").with_categories([
            category(category_id, "Garden"),
            category(category_id, "Outdoor"),
        ]);
        let saved = repo.save(product).await.unwrap();

        assert_eq!(
            saved.categories,
            Some(BTreeSet::from([category(category_id, "Outdoor")]))
        );
        let fetched = repo.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(fetched.categories, saved.categories);
    }

    #[tokio::test]
    async fn test_find_all_ordered_by_id() {
        let repo = InMemoryProductRepository::new();
        for name in ["a", "b", "c"] {
            repo.save(new_product(name)).await.unwrap();
        }

        let names: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryProductRepository::new();
        let saved = repo.save(new_product("Rake")).await.unwrap();

        repo.delete_by_id(saved.id).await.unwrap();
        assert!(repo.find_by_id(saved.id).await.unwrap().is_none());

        let result = repo.delete_by_id(saved.id).await;
        assert!(matches!(result, Err(ProductError::NotFound(1))));
    }
}
