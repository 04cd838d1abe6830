//! Product catalog with search, category, price-band and sort filters.
//!
//! The catalog is static data loaded from YAML. Filtering is a plain scan:
//! the demo store carries a few dozen products at most.

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use techstore_core::{CurrencyCode, Price, ProductId};
use tracing::{debug, instrument};

/// Bundled demo catalog.
const DEMO_CATALOG: &str = include_str!("../data/catalog.yaml");

/// Catalog loading errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(ProductId),
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
}

/// A product listed in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price in the catalog currency.
    pub price: Decimal,
    /// Price before discount, if the product is on sale.
    #[serde(default)]
    pub original_price: Option<Decimal>,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Units available; also the cap for cart quantities.
    pub stock: u32,
    /// Average review rating (0-5).
    #[serde(default)]
    pub rating: f32,
    /// Whether the description was rewritten by the assistant.
    #[serde(default)]
    pub ai_generated: bool,
}

impl Product {
    /// Primary image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Percentage off the original price, rounded down.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price?;
        if original <= self.price || original.is_zero() {
            return None;
        }
        ((original - self.price) / original * Decimal::ONE_HUNDRED)
            .floor()
            .to_u32()
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// Price filter bands offered by the storefront.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PriceBand {
    #[default]
    All,
    Under500,
    From500To1000,
    From1000To2000,
    Over2000,
}

impl PriceBand {
    /// Parse from URL parameter value. Unknown values mean no filter.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "under-500" => Self::Under500,
            "500-1000" => Self::From500To1000,
            "1000-2000" => Self::From1000To2000,
            "over-2000" => Self::Over2000,
            _ => Self::All,
        }
    }

    /// Convert to URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Under500 => "under-500",
            Self::From500To1000 => "500-1000",
            Self::From1000To2000 => "1000-2000",
            Self::Over2000 => "over-2000",
        }
    }

    /// Lower bound inclusive, upper bound exclusive.
    #[must_use]
    pub fn contains(self, price: Decimal) -> bool {
        let (min, max) = match self {
            Self::All => return true,
            Self::Under500 => (None, Some(500)),
            Self::From500To1000 => (Some(500), Some(1000)),
            Self::From1000To2000 => (Some(1000), Some(2000)),
            Self::Over2000 => (Some(2000), None),
        };
        min.is_none_or(|m| price >= Decimal::from(m))
            && max.is_none_or(|m| price < Decimal::from(m))
    }
}

/// Catalog sort order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSort {
    /// Catalog order.
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    /// Highest rated first.
    Rating,
    Name,
}

impl CatalogSort {
    /// Parse from URL parameter value.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-low" => Self::PriceLow,
            "price-high" => Self::PriceHigh,
            "rating" => Self::Rating,
            "name" => Self::Name,
            _ => Self::Featured,
        }
    }

    /// Convert to URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
            Self::Name => "name",
        }
    }
}

/// Catalog listing filters.
#[derive(Debug, Default, Clone)]
pub struct CatalogQuery {
    /// Case-insensitive substring over name, description and tags.
    pub search: String,
    /// Exact category match (None = all categories).
    pub category: Option<String>,
    pub price_band: PriceBand,
    pub sort: CatalogSort,
}

/// Autocomplete entries offered under the search box.
pub const SEARCH_SUGGESTIONS: &[&str] = &[
    "iPhone 14 Pro",
    "Samsung Galaxy",
    "MacBook",
    "ASUS ROG",
    "Gaming Laptop",
    "Auriculares Bluetooth",
    "AirPods",
    "Smart Watch",
    "Apple Watch",
    "Tablet iPad",
    "Cámara 4K",
    "Sony Alpha",
    "Monitor Gaming",
    "RTX 4080",
    "Procesador Intel",
    "SSD 1TB",
    "Memoria RAM",
    "Teclado mecánico",
    "Mouse gaming",
    "Webcam HD",
];

/// Quick filters shown as trending searches.
pub const TRENDING_SEARCHES: &[&str] = &["Gaming", "Apple", "Bluetooth", "4K", "Pro"];

const MAX_SEARCH_SUGGESTIONS: usize = 5;

/// Autocomplete for a partially typed query.
///
/// Nothing is suggested until the query has at least two characters; after
/// that, up to five entries of [`SEARCH_SUGGESTIONS`] containing the query,
/// ignoring case, in list order.
#[must_use]
pub fn search_suggestions(query: &str) -> Vec<&'static str> {
    if query.chars().count() <= 1 {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    SEARCH_SUGGESTIONS
        .iter()
        .copied()
        .filter(|s| s.to_lowercase().contains(&needle))
        .take(MAX_SEARCH_SUGGESTIONS)
        .collect()
}

/// The product catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Currency for every price in the catalog.
    #[serde(default)]
    pub currency: CurrencyCode,
    pub products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate product ids.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateProduct` if two products share an id.
    pub fn new(currency: CurrencyCode, products: Vec<Product>) -> Result<Self, CatalogError> {
        let catalog = Self { currency, products };
        catalog.check_unique_ids()?;
        Ok(catalog)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or ids repeat.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_yaml::from_str(yaml)?;
        catalog.check_unique_ids()?;
        Ok(catalog)
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_yaml_str(&content)?;
        debug!(products = catalog.products.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// The bundled demo catalog.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled YAML is broken.
    pub fn demo() -> Result<Self, CatalogError> {
        Self::from_yaml_str(DEMO_CATALOG)
    }

    fn check_unique_ids(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for product in &self.products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }
        Ok(())
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Price of a product in the catalog currency.
    #[must_use]
    pub const fn price_of(&self, product: &Product) -> Price {
        Price::new(product.price, self.currency)
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Apply listing filters and sort.
    #[must_use]
    pub fn query(&self, query: &CatalogQuery) -> Vec<&Product> {
        let needle = query.search.trim().to_lowercase();

        let mut products: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| needle.is_empty() || p.matches_search(&needle))
            .filter(|p| query.category.as_ref().is_none_or(|c| &p.category == c))
            .filter(|p| query.price_band.contains(p.price))
            .collect();

        // Stable sorts keep catalog order for ties.
        match query.sort {
            CatalogSort::Featured => {}
            CatalogSort::PriceLow => products.sort_by(|a, b| a.price.cmp(&b.price)),
            CatalogSort::PriceHigh => products.sort_by(|a, b| b.price.cmp(&a.price)),
            CatalogSort::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            CatalogSort::Name => {
                products.sort_by_key(|p| p.name.to_lowercase());
            }
        }

        products
    }

    /// Replace a product description with assistant-generated copy.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if the id is unknown.
    pub fn apply_description(
        &mut self,
        id: &ProductId,
        description: String,
    ) -> Result<(), CatalogError> {
        let product = self
            .products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CatalogError::ProductNotFound(id.clone()))?;
        product.description = description;
        product.ai_generated = true;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn product(id: &str, name: &str, category: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: format!("{name} description"),
            price: Decimal::from(price),
            original_price: None,
            category: category.to_string(),
            subcategory: None,
            tags: Vec::new(),
            images: vec![format!("/img/{id}.jpg")],
            stock: 5,
            rating: 4.0,
            ai_generated: false,
        }
    }

    fn sample() -> Catalog {
        let mut phone = product("1", "Smartphone Pro", "Electrónicos", 899);
        phone.tags = vec!["5G".to_string(), "Camera".to_string()];
        phone.rating = 4.8;
        let mut laptop = product("2", "Laptop Gamer", "Computadoras", 1899);
        laptop.rating = 4.5;
        let headphones = product("3", "audífonos bluetooth", "Electrónicos", 199);
        let mut monitor = product("4", "Monitor 4K", "Computadoras", 2499);
        monitor.rating = 4.8;
        Catalog::new(CurrencyCode::MXN, vec![phone, laptop, headphones, monitor]).unwrap()
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_search_matches_name_description_and_tags() {
        let catalog = sample();
        let by_name = catalog.query(&CatalogQuery {
            search: "LAPTOP".to_string(),
            ..Default::default()
        });
        assert_eq!(ids(&by_name), ["2"]);

        let by_tag = catalog.query(&CatalogQuery {
            search: "camera".to_string(),
            ..Default::default()
        });
        assert_eq!(ids(&by_tag), ["1"]);

        let by_description = catalog.query(&CatalogQuery {
            search: "4k description".to_string(),
            ..Default::default()
        });
        assert_eq!(ids(&by_description), ["4"]);
    }

    #[test]
    fn test_category_and_price_band() {
        let catalog = sample();
        let result = catalog.query(&CatalogQuery {
            category: Some("Computadoras".to_string()),
            price_band: PriceBand::From1000To2000,
            ..Default::default()
        });
        assert_eq!(ids(&result), ["2"]);

        let cheap = catalog.query(&CatalogQuery {
            price_band: PriceBand::Under500,
            ..Default::default()
        });
        assert_eq!(ids(&cheap), ["3"]);
    }

    #[test]
    fn test_price_band_bounds() {
        assert!(PriceBand::From500To1000.contains(Decimal::from(500)));
        assert!(!PriceBand::From500To1000.contains(Decimal::from(1000)));
        assert!(PriceBand::Over2000.contains(Decimal::from(2000)));
        assert!(PriceBand::All.contains(Decimal::from(-1)));
        assert_eq!(PriceBand::parse("bogus"), PriceBand::All);
    }

    #[test]
    fn test_sorts() {
        let catalog = sample();
        let sorted = |sort| {
            ids(&catalog.query(&CatalogQuery {
                sort,
                ..Default::default()
            }))
        };

        assert_eq!(sorted(CatalogSort::Featured), ["1", "2", "3", "4"]);
        assert_eq!(sorted(CatalogSort::PriceLow), ["3", "1", "2", "4"]);
        assert_eq!(sorted(CatalogSort::PriceHigh), ["4", "2", "1", "3"]);
        // Ties keep catalog order.
        assert_eq!(sorted(CatalogSort::Rating), ["1", "4", "2", "3"]);
        assert_eq!(sorted(CatalogSort::Name), ["3", "2", "4", "1"]);
    }

    #[test]
    fn test_categories_first_seen_order() {
        assert_eq!(sample().categories(), ["Electrónicos", "Computadoras"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Catalog::new(
            CurrencyCode::MXN,
            vec![product("1", "A", "X", 1), product("1", "B", "X", 2)],
        );
        assert!(matches!(result, Err(CatalogError::DuplicateProduct(_))));
    }

    #[test]
    fn test_apply_description_marks_ai_generated() {
        let mut catalog = sample();
        let id = ProductId::new("3");
        catalog
            .apply_description(&id, "Nueva descripción".to_string())
            .unwrap();
        let product = catalog.get(&id).unwrap();
        assert_eq!(product.description, "Nueva descripción");
        assert!(product.ai_generated);

        let missing = catalog.apply_description(&ProductId::new("nope"), String::new());
        assert!(matches!(missing, Err(CatalogError::ProductNotFound(_))));
    }

    #[test]
    fn test_discount_percent() {
        let mut p = product("9", "Tablet", "X", 750);
        assert_eq!(p.discount_percent(), None);
        p.original_price = Some(Decimal::from(1000));
        assert_eq!(p.discount_percent(), Some(25));
    }

    #[test]
    fn test_suggestions_need_two_characters() {
        assert!(search_suggestions("").is_empty());
        assert!(search_suggestions("a").is_empty());
        assert!(search_suggestions("á").is_empty());
        assert_eq!(search_suggestions("ai"), vec!["AirPods"]);
    }

    #[test]
    fn test_suggestions_ignore_case_and_cap_at_five() {
        assert_eq!(
            search_suggestions("GAMING"),
            vec!["Gaming Laptop", "Monitor Gaming", "Mouse gaming"]
        );

        // Six entries contain "am"; "Webcam HD" is the sixth.
        assert_eq!(
            search_suggestions("Am"),
            vec![
                "Samsung Galaxy",
                "Gaming Laptop",
                "Monitor Gaming",
                "Memoria RAM",
                "Mouse gaming",
            ]
        );
        assert!(search_suggestions("zz").is_empty());
    }

    #[test]
    fn test_demo_catalog_parses() {
        let catalog = Catalog::demo().unwrap();
        assert!(catalog.products.len() >= 5);
        assert_eq!(catalog.currency, CurrencyCode::MXN);
    }
}
