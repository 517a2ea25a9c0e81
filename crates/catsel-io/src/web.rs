//! VizieR query source. Validates the request against the registries;
//! the query itself is not implemented and no network call is made.

use tracing::{error, warn};

use catsel_catalog::Catalog;
use catsel_core::error::Error as CoreError;
use catsel_core::registry::{known_catalog, mirror_site, KnownCatalog, MirrorSite};

use crate::error::{Error, Result};
use crate::source::CatalogSource;

#[derive(Debug, Clone)]
pub struct WebCatalogSource {
    code: String,
    mirror: String,
}

impl WebCatalogSource {
    pub fn new(code: impl Into<String>, mirror: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            mirror: mirror.into(),
        }
    }

    fn resolve(&self) -> Result<(&'static KnownCatalog, &'static MirrorSite)> {
        if self.mirror.trim().is_empty() {
            return Err(Error::UnknownMirror("<empty>".into()));
        }
        let site =
            mirror_site(&self.mirror).ok_or_else(|| Error::UnknownMirror(self.mirror.clone()))?;
        let cat =
            known_catalog(&self.code).ok_or_else(|| Error::UnknownCatalog(self.code.clone()))?;
        Ok((cat, site))
    }

    fn query(&self, catalog: &Catalog, max_rows: Option<usize>) -> Result<usize> {
        let (cat, site) = self.resolve()?;
        if catalog.row_count() > 0 {
            return Err(CoreError::AlreadyImported(format!(
                "'{}' already holds rows",
                catalog.info().code
            ))
            .into());
        }
        if max_rows == Some(0) {
            warn!(catalog = cat.name, "trying to query whole catalog");
        }
        error!(catalog = cat.vizier_id, host = site.host, "web query not implemented");
        Err(CoreError::NotImplemented(format!(
            "web query of '{}' from {}",
            cat.vizier_id, site.host
        ))
        .into())
    }
}

impl CatalogSource for WebCatalogSource {
    fn name(&self) -> &str {
        "web"
    }

    fn describe(&mut self, catalog: &mut Catalog) -> Result<usize> {
        self.query(catalog, None)
    }

    fn load(&mut self, catalog: &mut Catalog, max_rows: usize) -> Result<usize> {
        self.query(catalog, Some(max_rows))
    }
}
