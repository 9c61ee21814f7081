use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use bazaar_core::{DomainError, DomainResult, Money};

use crate::product::{Product, ProductId, ProductKind};

/// Errors raised while reading a catalog file at startup.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid catalog: {0}")]
    Domain(#[from] DomainError),
}

/// Read-only list of purchasable products.
///
/// Products keep their insertion order; ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate product ids with `Conflict`.
    pub fn new(products: impl IntoIterator<Item = Product>) -> DomainResult<Self> {
        let mut catalog = Catalog::default();
        for product in products {
            let id = product.id().clone();
            if catalog.index.contains_key(&id) {
                return Err(DomainError::conflict(format!("duplicate product id {id}")));
            }
            catalog.index.insert(id, catalog.products.len());
            catalog.products.push(product);
        }
        Ok(catalog)
    }

    /// Parse a JSON array of products.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogLoadError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Ok(Catalog::new(products)?)
    }

    /// Read and parse a JSON catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), products = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// All products in insertion order.
    ///
    /// The iterator is lazy; call again (or clone it) to restart.
    pub fn list_products(&self) -> core::slice::Iter<'_, Product> {
        self.products.iter()
    }

    pub fn find_by_id(&self, id: &ProductId) -> DomainResult<&Product> {
        self.get(id)
            .ok_or_else(|| DomainError::not_found("product", id))
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).map(|&i| &self.products[i])
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Built-in catalog used when no catalog file is configured.
    pub fn sample() -> Self {
        let physical = |id: &str, name: &str, paise: u64, stock: u32, grams: u32| {
            sample_product(id, name, paise, stock, ProductKind::Physical { weight_grams: grams })
        };
        let digital = |id: &str, name: &str, paise: u64, stock: u32, link: &str| {
            sample_product(
                id,
                name,
                paise,
                stock,
                ProductKind::Digital {
                    download_link: link.to_string(),
                },
            )
        };

        let products = vec![
            physical("001A", "Tata Salt 1kg", 2_800, 100, 1_000),
            physical("002A", "Amul Butter 100g", 5_000, 50, 100),
            physical("003A", "Parle-G Biscuits 100g", 1_000, 200, 100),
            physical("004A", "Maggi Noodles 70g", 1_200, 150, 70),
            physical("005A", "Dettol Soap 75g", 3_500, 80, 75),
            digital(
                "006A",
                "Bollywood Movie - Sholay",
                9_900,
                1_000,
                "https://store.example.com/download/sholay",
            ),
            digital(
                "007A",
                "Hindi Learning Course",
                79_900,
                500,
                "https://courses.example.com/hindi-basic",
            ),
            digital(
                "008A",
                "Indian Classical Music Collection",
                24_900,
                300,
                "https://music.example.com/classical-indian",
            ),
            digital(
                "009A",
                "Yoga for Beginners",
                49_900,
                200,
                "https://fitness.example.com/yoga-course",
            ),
        ];

        Catalog {
            index: products
                .iter()
                .enumerate()
                .map(|(i, p)| (p.id().clone(), i))
                .collect(),
            products,
        }
    }
}

fn sample_product(id: &str, name: &str, paise: u64, stock: u32, kind: ProductKind) -> Product {
    Product::trusted(id, name, Money::from_minor(paise))
        .with_kind(kind)
        .with_stock(stock)
}
