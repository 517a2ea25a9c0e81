//! Producer seam: anything that can describe and fill a `Catalog`.

use catsel_catalog::Catalog;

use crate::error::Result;

pub trait CatalogSource {
    /// Short label for logs.
    fn name(&self) -> &str;

    /// Import the column description. Returns the number of quantities.
    fn describe(&mut self, catalog: &mut Catalog) -> Result<usize>;

    /// Import at most `max_rows` rows, describing first if needed. A
    /// `max_rows` of 0 imports every row the source has.
    /// Returns the catalog's row count.
    fn load(&mut self, catalog: &mut Catalog, max_rows: usize) -> Result<usize>;
}
