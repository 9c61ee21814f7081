use serde::{Deserialize, Serialize};

use bazaar_core::{DomainError, DomainResult, Money};

/// Product identifier, e.g. `"1"` or `"001A"`.
///
/// Always non-empty and free of whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    pub fn new(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("product id cannot be empty"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(DomainError::invalid_id(format!(
                "product id '{trimmed}' contains whitespace"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProductId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductId> for String {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

/// What kind of goods a product is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProductKind {
    #[default]
    Generic,
    Physical {
        weight_grams: u32,
    },
    Digital {
        download_link: String,
    },
}

impl ProductKind {
    pub fn label(&self) -> &'static str {
        match self {
            ProductKind::Generic => "Generic Product",
            ProductKind::Physical { .. } => "Physical Product",
            ProductKind::Digital { .. } => "Digital Product",
        }
    }
}

/// A purchasable product. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    id: ProductId,
    name: String,
    unit_price: Money,
    kind: ProductKind,
    /// `None` means stock is not tracked for this product.
    stock: Option<u32>,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, unit_price: Money) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "product {id}: name cannot be empty"
            )));
        }
        Ok(Self {
            id,
            name: name.trim().to_string(),
            unit_price,
            kind: ProductKind::Generic,
            stock: None,
        })
    }

    /// Build from literals known to be valid (built-in sample data).
    pub(crate) fn trusted(id: &str, name: &str, unit_price: Money) -> Self {
        Self {
            id: ProductId(id.to_string()),
            name: name.to_string(),
            unit_price,
            kind: ProductKind::Generic,
            stock: None,
        }
    }

    pub fn with_kind(mut self, kind: ProductKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = Some(stock);
        self
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn kind(&self) -> &ProductKind {
        &self.kind
    }

    pub fn stock(&self) -> Option<u32> {
        self.stock
    }

    /// Fail with `InsufficientStock` if `requested` exceeds tracked stock.
    pub fn ensure_available(&self, requested: u64) -> DomainResult<()> {
        match self.stock {
            Some(available) if requested > u64::from(available) => Err(
                DomainError::insufficient_stock(self.name.clone(), requested, available),
            ),
            _ => Ok(()),
        }
    }
}

/// Wire shape of a product in catalog files.
///
/// Two layouts are read. The native one nests the kind:
/// `{"id", "name", "price", "stock", "kind": {"type": "physical", "weight_grams"}}`.
/// The flat one keeps everything at the top level:
/// `{"type", "product_id", "name", "price", "quantity_available", "weight" | "download_link"}`
/// with `weight` in kilograms. Products are always written in the native layout.
#[derive(Debug, Serialize, Deserialize)]
struct ProductRecord {
    #[serde(alias = "product_id")]
    id: ProductId,
    name: String,
    price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<ProductKind>,
    #[serde(default, alias = "quantity_available", skip_serializing_if = "Option::is_none")]
    stock: Option<u32>,

    #[serde(rename = "type", default, skip_serializing)]
    flat_type: Option<String>,
    #[serde(default, skip_serializing)]
    weight: Option<f64>,
    #[serde(default, skip_serializing)]
    download_link: Option<String>,
}

impl ProductRecord {
    fn resolve_kind(
        id: &ProductId,
        kind: Option<ProductKind>,
        flat_type: Option<String>,
        weight: Option<f64>,
        download_link: Option<String>,
    ) -> DomainResult<ProductKind> {
        if let Some(kind) = kind {
            return Ok(kind);
        }

        let flat_type = flat_type.unwrap_or_default().to_ascii_lowercase();
        match flat_type.as_str() {
            "" | "generic" => Ok(ProductKind::Generic),
            "physical" => {
                let kilograms = weight.ok_or_else(|| {
                    DomainError::validation(format!("product {id}: physical product needs a weight"))
                })?;
                let weight_grams = kilograms_to_grams(kilograms).ok_or_else(|| {
                    DomainError::validation(format!("product {id}: invalid weight {kilograms}"))
                })?;
                Ok(ProductKind::Physical { weight_grams })
            }
            "digital" => {
                let download_link = download_link.ok_or_else(|| {
                    DomainError::validation(format!(
                        "product {id}: digital product needs a download_link"
                    ))
                })?;
                Ok(ProductKind::Digital { download_link })
            }
            other => Err(DomainError::validation(format!(
                "product {id}: unknown product type '{other}'"
            ))),
        }
    }
}

fn kilograms_to_grams(kilograms: f64) -> Option<u32> {
    let grams = (kilograms * 1_000.0).round();
    if grams.is_finite() && (0.0..=f64::from(u32::MAX)).contains(&grams) {
        Some(grams as u32)
    } else {
        None
    }
}

impl TryFrom<ProductRecord> for Product {
    type Error = DomainError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let ProductRecord {
            id,
            name,
            price,
            kind,
            stock,
            flat_type,
            weight,
            download_link,
        } = record;

        let kind = ProductRecord::resolve_kind(&id, kind, flat_type, weight, download_link)?;
        let product = Product::new(id, name, price)?.with_kind(kind);
        Ok(match stock {
            Some(stock) => product.with_stock(stock),
            None => product,
        })
    }
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.unit_price,
            kind: Some(product.kind),
            stock: product.stock,
            flat_type: None,
            weight: None,
            download_link: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(raw: &str) -> ProductId {
        ProductId::new(raw).unwrap()
    }

    #[test]
    fn product_id_is_trimmed() {
        assert_eq!(pid("  001A ").as_str(), "001A");
    }

    #[test]
    fn product_id_rejects_blank_and_inner_whitespace() {
        assert!(matches!(ProductId::new("   "), Err(DomainError::InvalidId(_))));
        assert!(matches!(ProductId::new("a b"), Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn new_product_rejects_empty_name() {
        let err = Product::new(pid("1"), "  ", Money::from_major(1)).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("name cannot be empty") => {}
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn ensure_available_respects_tracked_stock() {
        let product = Product::new(pid("1"), "Pen", Money::from_major(2))
            .unwrap()
            .with_stock(5);
        assert!(product.ensure_available(5).is_ok());
        assert_eq!(
            product.ensure_available(6).unwrap_err(),
            DomainError::insufficient_stock("Pen", 6, 5)
        );
    }

    #[test]
    fn untracked_stock_never_runs_out() {
        let product = Product::new(pid("1"), "Pen", Money::from_major(2)).unwrap();
        assert!(product.ensure_available(u64::MAX).is_ok());
    }

    #[test]
    fn deserializes_from_catalog_record() {
        let json = r#"{
            "id": "006A",
            "name": "Bollywood Movie - Sholay",
            "price": "99.00",
            "stock": 1000,
            "kind": { "type": "digital", "download_link": "https://store.example.com/download/sholay" }
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id().as_str(), "006A");
        assert_eq!(product.unit_price(), Money::from_major(99));
        assert_eq!(product.stock(), Some(1000));
        assert_eq!(product.kind().label(), "Digital Product");
    }

    #[test]
    fn kind_defaults_to_generic() {
        let product: Product =
            serde_json::from_str(r#"{"id":"1","name":"Pen","price":2.0}"#).unwrap();
        assert_eq!(product.kind(), &ProductKind::Generic);
        assert_eq!(product.stock(), None);
    }

    #[test]
    fn deserializes_flat_physical_record_with_weight_in_kilograms() {
        let json = r#"{
            "type": "physical",
            "product_id": "001A",
            "name": "Tata Salt 1kg",
            "price": 28.0,
            "quantity_available": 100,
            "weight": 1.0
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id().as_str(), "001A");
        assert_eq!(product.unit_price(), Money::from_major(28));
        assert_eq!(product.stock(), Some(100));
        assert_eq!(product.kind(), &ProductKind::Physical { weight_grams: 1_000 });
    }

    #[test]
    fn deserializes_flat_digital_and_generic_records() {
        let digital: Product = serde_json::from_str(
            r#"{"type":"digital","product_id":"007A","name":"Hindi Learning Course",
                "price":799.0,"quantity_available":500,
                "download_link":"https://courses.example.com/hindi-basic"}"#,
        )
        .unwrap();
        assert_eq!(
            digital.kind(),
            &ProductKind::Digital {
                download_link: "https://courses.example.com/hindi-basic".to_string()
            }
        );

        let generic: Product = serde_json::from_str(
            r#"{"type":"generic","product_id":"1","name":"Pen","price":2.5,"quantity_available":3}"#,
        )
        .unwrap();
        assert_eq!(generic.kind(), &ProductKind::Generic);
        assert_eq!(generic.unit_price(), Money::from_minor(250));
    }

    #[test]
    fn flat_record_missing_kind_fields_is_rejected() {
        let no_weight = serde_json::from_str::<Product>(
            r#"{"type":"physical","product_id":"1","name":"Box","price":1,"quantity_available":1}"#,
        );
        assert!(no_weight.unwrap_err().to_string().contains("needs a weight"));

        let unknown = serde_json::from_str::<Product>(
            r#"{"type":"service","product_id":"1","name":"Repair","price":1}"#,
        );
        assert!(unknown.unwrap_err().to_string().contains("unknown product type 'service'"));
    }

    #[test]
    fn serializes_in_native_layout() {
        let product = Product::new(pid("2"), "Book", Money::from_major(10))
            .unwrap()
            .with_kind(ProductKind::Physical { weight_grams: 350 })
            .with_stock(5);
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], "2");
        assert_eq!(json["stock"], 5);
        assert_eq!(json["kind"]["type"], "physical");
        assert_eq!(json["kind"]["weight_grams"], 350);
        assert!(json.get("type").is_none());

        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn kilograms_round_to_whole_grams() {
        assert_eq!(kilograms_to_grams(0.075), Some(75));
        assert_eq!(kilograms_to_grams(1.5), Some(1_500));
        assert_eq!(kilograms_to_grams(-1.0), None);
        assert_eq!(kilograms_to_grams(f64::NAN), None);
    }

    #[test]
    fn deserialize_rejects_blank_name() {
        let result = serde_json::from_str::<Product>(r#"{"id":"1","name":"","price":"1"}"#);
        assert!(result.is_err());
    }
}
