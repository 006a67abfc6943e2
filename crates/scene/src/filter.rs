use std::collections::BTreeSet;

use catalog::{Catalog, Category, Poi};

/// Set of enabled categories. Starts with every category enabled; an empty
/// set is legal and simply hides every point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    active: BTreeSet<Category>,
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl CategoryFilter {
    pub fn all() -> Self {
        Self {
            active: Category::ALL.into_iter().collect(),
        }
    }

    pub fn none() -> Self {
        Self {
            active: BTreeSet::new(),
        }
    }

    /// Flips membership of `category` and returns whether it is now enabled.
    pub fn toggle(&mut self, category: Category) -> bool {
        if self.active.remove(&category) {
            false
        } else {
            self.active.insert(category);
            true
        }
    }

    pub fn set_enabled(&mut self, category: Category, enabled: bool) {
        if enabled {
            self.active.insert(category);
        } else {
            self.active.remove(&category);
        }
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        self.active.contains(&category)
    }

    pub fn is_visible(&self, poi: &Poi) -> bool {
        self.is_enabled(poi.category)
    }

    /// Enabled categories in display order.
    pub fn active_categories(&self) -> Vec<Category> {
        self.active.iter().copied().collect()
    }
}

/// Visible subset of a catalog, as a bitset over catalog indices.
///
/// Iteration yields indices in ascending order, i.e. catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleSet {
    words: Vec<u64>,
    len: usize,
}

impl VisibleSet {
    pub fn collect(catalog: &Catalog, filter: &CategoryFilter) -> Self {
        let mut set = Self {
            words: vec![0; catalog.len().div_ceil(64)],
            len: 0,
        };
        for (index, poi) in catalog.points().iter().enumerate() {
            if filter.is_visible(poi) {
                set.insert_index(index as u32);
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains_index(&self, index: u32) -> bool {
        let (word, bit) = word_bit(index);
        self.words
            .get(word)
            .is_some_and(|w| (w & (1u64 << bit)) != 0)
    }

    /// Membership by id; ids missing from `catalog` are never visible.
    pub fn contains_id(&self, catalog: &Catalog, id: &str) -> bool {
        catalog
            .index_of(id)
            .is_some_and(|i| self.contains_index(i as u32))
    }

    fn insert_index(&mut self, index: u32) {
        let (word, bit) = word_bit(index);
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        let mask = 1u64 << bit;
        if self.words[word] & mask == 0 {
            self.words[word] |= mask;
            self.len += 1;
        }
    }

    pub fn iter_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &w)| {
            let base = wi as u32 * 64;
            BitIter(w).map(move |bit| base + bit)
        })
    }

    /// Visible points in catalog order.
    pub fn points<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a Poi> + 'a {
        self.iter_indices()
            .filter_map(move |i| catalog.points().get(i as usize))
    }
}

fn word_bit(index: u32) -> (usize, u32) {
    ((index / 64) as usize, index % 64)
}

struct BitIter(u64);

impl Iterator for BitIter {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.0 == 0 {
            return None;
        }
        let tz = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Some(tz)
    }
}

#[cfg(test)]
mod tests {
    use super::{CategoryFilter, VisibleSet};
    use catalog::{Catalog, Category};
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_with_everything_enabled() {
        let filter = CategoryFilter::default();
        assert_eq!(filter.active_categories(), Category::ALL.to_vec());
    }

    #[test]
    fn toggle_flips_membership_and_may_empty_the_set() {
        let mut filter = CategoryFilter::all();
        for c in Category::ALL {
            assert!(!filter.toggle(c));
        }
        assert!(filter.active_categories().is_empty());
        assert!(filter.toggle(Category::Pub));
        assert_eq!(filter.active_categories(), vec![Category::Pub]);
    }

    #[test]
    fn visible_set_matches_filter_in_catalog_order() {
        let catalog = Catalog::festival().unwrap();
        let mut filter = CategoryFilter::none();
        filter.set_enabled(Category::Stage, true);
        filter.set_enabled(Category::Parking, true);

        let visible = VisibleSet::collect(&catalog, &filter);
        let ids: Vec<&str> = visible.points(&catalog).map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["stage-main", "stage-busking", "parking-main"]);
        assert_eq!(visible.len(), 3);
        assert!(visible.contains_id(&catalog, "parking-main"));
        assert!(!visible.contains_id(&catalog, "pub-g1"));
        assert!(!visible.contains_id(&catalog, "missing"));
    }

    #[test]
    fn empty_filter_yields_empty_set() {
        let catalog = Catalog::festival().unwrap();
        let visible = VisibleSet::collect(&catalog, &CategoryFilter::none());
        assert!(visible.is_empty());
        assert_eq!(visible.iter_indices().count(), 0);
    }
}
