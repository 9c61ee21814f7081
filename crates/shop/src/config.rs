//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;

use bazaar_catalog::{Catalog, CatalogLoadError};
use bazaar_observability::LogFormat;

use crate::render::Renderer;

/// Interactive console shop.
#[derive(Debug, Clone, Parser)]
#[command(name = "bazaar", version, about)]
pub struct ShopArgs {
    /// JSON catalog file. The built-in sample catalog is used when omitted.
    #[arg(long, env = "BAZAAR_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Currency symbol shown in front of prices.
    #[arg(long, env = "BAZAAR_CURRENCY", default_value = "₹")]
    pub currency: String,

    /// Log output format on stderr (pretty or json).
    #[arg(long, env = "BAZAAR_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl ShopArgs {
    pub fn load_catalog(&self) -> Result<Catalog, CatalogLoadError> {
        match &self.catalog {
            Some(path) => Catalog::load(path),
            None => Ok(Catalog::sample()),
        }
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.currency.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = ShopArgs::try_parse_from([
            "bazaar",
            "--catalog",
            "/tmp/products.json",
            "--currency",
            "$",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.catalog, Some(PathBuf::from("/tmp/products.json")));
        assert_eq!(args.currency, "$");
        assert_eq!(args.log_format, LogFormat::Json);
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(ShopArgs::try_parse_from(["bazaar", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn missing_catalog_file_is_an_io_error() {
        let args = ShopArgs::try_parse_from([
            "bazaar",
            "--catalog",
            "/definitely/not/here/catalog.json",
        ])
        .unwrap();
        assert!(matches!(
            args.load_catalog(),
            Err(CatalogLoadError::Io { .. })
        ));
    }

    #[test]
    fn sample_catalog_without_a_path() {
        let args = ShopArgs {
            catalog: None,
            currency: "₹".to_string(),
            log_format: LogFormat::Pretty,
        };
        assert_eq!(args.load_catalog().unwrap(), Catalog::sample());
    }
}
