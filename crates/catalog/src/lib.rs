use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

mod category;
mod poi;

pub use category::{Category, CategoryStyle};
pub use poi::{MapImage, PixelCoord, Poi, PoiId};

const FESTIVAL_JSON: &str = include_str!("../data/festival.json");

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    Parse(String),
    DuplicateId(String),
    InvalidCoord { id: String },
    EmptyImage,
    MissingStyle(Category),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Parse(msg) => write!(f, "catalog parse error: {msg}"),
            CatalogError::DuplicateId(id) => write!(f, "duplicate point id: {id}"),
            CatalogError::InvalidCoord { id } => {
                write!(f, "point {id} has a non-finite coordinate")
            }
            CatalogError::EmptyImage => write!(f, "map image must have a positive size"),
            CatalogError::MissingStyle(c) => write!(f, "no style for category {c}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// On-disk/JSON shape of a full catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub image: MapImage,
    pub categories: BTreeMap<Category, CategoryStyle>,
    pub points: Vec<Poi>,
}

/// Immutable, validated set of points plus the image and category styles.
///
/// Points keep their supplied order; lookups by id are O(1).
#[derive(Debug, Clone)]
pub struct Catalog {
    image: MapImage,
    styles: BTreeMap<Category, CategoryStyle>,
    points: Vec<Poi>,
    index: HashMap<PoiId, usize>,
    revision: String,
}

impl Catalog {
    pub fn new(
        image: MapImage,
        styles: BTreeMap<Category, CategoryStyle>,
        points: Vec<Poi>,
    ) -> Result<Self, CatalogError> {
        if !(image.width > 0.0 && image.height > 0.0) {
            return Err(CatalogError::EmptyImage);
        }
        if let Some(missing) = Category::ALL.into_iter().find(|c| !styles.contains_key(c)) {
            return Err(CatalogError::MissingStyle(missing));
        }

        let mut index = HashMap::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            if !(p.coord.x.is_finite() && p.coord.y.is_finite()) {
                return Err(CatalogError::InvalidCoord {
                    id: p.id.to_string(),
                });
            }
            if index.insert(p.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(p.id.to_string()));
            }
        }

        let revision = revision_of(&points)?;
        debug!(points = points.len(), %revision, "catalog loaded");
        Ok(Self {
            image,
            styles,
            points,
            index,
            revision,
        })
    }

    pub fn from_document(doc: CatalogDocument) -> Result<Self, CatalogError> {
        Self::new(doc.image, doc.categories, doc.points)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let doc = serde_json::from_str::<CatalogDocument>(json)
            .map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_document(doc)
    }

    /// Parses a bare JSON array of points and pairs it with `image` and `styles`.
    pub fn points_from_json(
        json: &str,
        image: MapImage,
        styles: BTreeMap<Category, CategoryStyle>,
    ) -> Result<Self, CatalogError> {
        let points = serde_json::from_str::<Vec<Poi>>(json)
            .map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(image, styles, points)
    }

    /// The built-in festival map.
    pub fn festival() -> Result<Self, CatalogError> {
        Self::from_json(FESTIVAL_JSON)
    }

    pub fn image(&self) -> &MapImage {
        &self.image
    }

    pub fn styles(&self) -> &BTreeMap<Category, CategoryStyle> {
        &self.styles
    }

    pub fn style(&self, category: Category) -> Option<&CategoryStyle> {
        self.styles.get(&category)
    }

    pub fn points(&self) -> &[Poi] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Poi> {
        self.index_of(id).map(|i| &self.points[i])
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Content hash of the points; equal revisions mean identical points.
    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn to_document(&self) -> CatalogDocument {
        CatalogDocument {
            image: self.image.clone(),
            categories: self.styles.clone(),
            points: self.points.clone(),
        }
    }
}

fn revision_of(points: &[Poi]) -> Result<String, CatalogError> {
    let bytes = serde_json::to_vec(points).map_err(|e| CatalogError::Parse(e.to_string()))?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}
