use super::PhotoRef;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::Arc;

/// The fetched photo universe, newest first.
///
/// Built once from a full fetch and never reordered or edited; a new fetch
/// means a new `load`.
#[derive(Debug, Clone, Default)]
pub struct PhotoCatalog {
    photos: Vec<Arc<PhotoRef>>,
    available_years: Vec<i32>,
}

impl PhotoCatalog {
    /// Stores `assets` in the given order and derives the years present.
    ///
    /// The caller is expected to pass assets sorted newest first. Assets
    /// without a creation time stay in the catalog but contribute no year.
    pub fn load(assets: Vec<PhotoRef>) -> Self {
        Self::from_shared(assets.into_iter().map(Arc::new).collect())
    }

    fn from_shared(photos: Vec<Arc<PhotoRef>>) -> Self {
        let years: BTreeSet<i32> = photos.iter().filter_map(|p| p.year()).collect();
        let available_years: Vec<i32> = years.into_iter().rev().collect();

        tracing::info!(
            photos = photos.len(),
            years = available_years.len(),
            "photo catalog loaded"
        );

        Self {
            photos,
            available_years,
        }
    }

    /// Distinct years present, most recent first
    pub fn available_years(&self) -> &[i32] {
        &self.available_years
    }

    /// Order-preserving subsequence of photos taken in `year`.
    ///
    /// An empty result is not an error.
    pub fn filter_by_year(&self, year: i32) -> Vec<Arc<PhotoRef>> {
        self.photos
            .iter()
            .filter(|p| p.year() == Some(year))
            .cloned()
            .collect()
    }

    /// A catalog equal to reloading the library after `removed` were deleted
    pub fn without(&self, removed: &[Arc<PhotoRef>]) -> Self {
        let removed: HashSet<&Path> = removed.iter().map(|p| p.id()).collect();
        Self::from_shared(
            self.photos
                .iter()
                .filter(|p| !removed.contains(p.id()))
                .cloned()
                .collect(),
        )
    }

    pub fn count_for_year(&self, year: i32) -> usize {
        self.photos.iter().filter(|p| p.year() == Some(year)).count()
    }

    pub fn photos(&self) -> &[Arc<PhotoRef>] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn photo(name: &str, year: Option<i32>) -> PhotoRef {
        PhotoRef {
            path: PathBuf::from(name),
            name: name.to_string(),
            size: 0,
            created: year.map(|y| Utc.with_ymd_and_hms(y, 6, 15, 12, 0, 0).unwrap()),
        }
    }

    fn names(photos: &[Arc<PhotoRef>]) -> Vec<&str> {
        photos.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_load_keeps_order() {
        let catalog = PhotoCatalog::load(vec![
            photo("p1.jpg", Some(2024)),
            photo("p2.jpg", Some(2023)),
            photo("p3.jpg", Some(2024)),
        ]);

        assert_eq!(catalog.len(), 3);
        assert_eq!(names(catalog.photos()), vec!["p1.jpg", "p2.jpg", "p3.jpg"]);
    }

    #[test]
    fn test_available_years_example() {
        let catalog = PhotoCatalog::load(vec![
            photo("p1.jpg", Some(2024)),
            photo("p2.jpg", Some(2023)),
            photo("p3.jpg", Some(2024)),
        ]);

        assert_eq!(catalog.available_years(), &[2024, 2023]);
        assert_eq!(names(&catalog.filter_by_year(2024)), vec!["p1.jpg", "p3.jpg"]);
    }

    #[test]
    fn test_available_years_distinct_and_descending() {
        let catalog = PhotoCatalog::load(vec![
            photo("a.jpg", Some(2019)),
            photo("b.jpg", Some(2021)),
            photo("c.jpg", Some(2019)),
            photo("d.jpg", Some(2015)),
            photo("e.jpg", Some(2021)),
        ]);

        let years = catalog.available_years();
        assert_eq!(years, &[2021, 2019, 2015]);
        assert!(years.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_undated_photos_excluded_from_years_but_kept() {
        let catalog = PhotoCatalog::load(vec![
            photo("dated.jpg", Some(2022)),
            photo("undated.jpg", None),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.available_years(), &[2022]);
        assert_eq!(names(&catalog.filter_by_year(2022)), vec!["dated.jpg"]);
    }

    #[test]
    fn test_filter_by_year_no_match() {
        let catalog = PhotoCatalog::load(vec![photo("a.jpg", Some(2020))]);
        assert!(catalog.filter_by_year(1999).is_empty());
        assert_eq!(catalog.count_for_year(1999), 0);
    }

    #[test]
    fn test_filter_preserves_relative_order() {
        let catalog = PhotoCatalog::load(vec![
            photo("a.jpg", Some(2020)),
            photo("b.jpg", Some(2021)),
            photo("c.jpg", Some(2020)),
            photo("d.jpg", Some(2021)),
            photo("e.jpg", Some(2020)),
        ]);

        assert_eq!(
            names(&catalog.filter_by_year(2020)),
            vec!["a.jpg", "c.jpg", "e.jpg"]
        );
        assert_eq!(catalog.count_for_year(2021), 2);
    }

    #[test]
    fn test_filter_shares_catalog_entries() {
        let catalog = PhotoCatalog::load(vec![photo("a.jpg", Some(2020))]);
        let filtered = catalog.filter_by_year(2020);
        assert!(Arc::ptr_eq(&filtered[0], &catalog.photos()[0]));
    }

    #[test]
    fn test_without_removes_deleted_photos() {
        let catalog = PhotoCatalog::load(vec![
            photo("a.jpg", Some(2024)),
            photo("b.jpg", Some(2023)),
            photo("c.jpg", Some(2024)),
        ]);
        let deleted = vec![catalog.photos()[1].clone()];

        let remaining = catalog.without(&deleted);

        assert_eq!(names(remaining.photos()), vec!["a.jpg", "c.jpg"]);
        assert_eq!(remaining.available_years(), &[2024]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = PhotoCatalog::load(vec![]);
        assert!(catalog.is_empty());
        assert!(catalog.available_years().is_empty());
    }

    #[test]
    fn test_reload_replaces_state() {
        let catalog = PhotoCatalog::load(vec![photo("old.jpg", Some(2010))]);
        assert_eq!(catalog.available_years(), &[2010]);

        let catalog = PhotoCatalog::load(vec![photo("new.jpg", Some(2024))]);
        assert_eq!(catalog.available_years(), &[2024]);
        assert_eq!(names(catalog.photos()), vec!["new.jpg"]);
    }
}
