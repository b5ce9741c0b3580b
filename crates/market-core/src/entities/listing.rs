//! Listing entity - an item offered for sale

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a listing
///
/// Clients speak the English names, the `listings.status` column stores the
/// Dutch ones. Parsing accepts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Paused,
    Sold,
    Draft,
}

impl ListingStatus {
    /// Name used in API payloads
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Sold => "sold",
            Self::Draft => "draft",
        }
    }

    /// Value stored in the database
    pub fn db_value(self) -> &'static str {
        match self {
            Self::Active => "actief",
            Self::Paused => "gepauzeerd",
            Self::Sold => "verkocht",
            Self::Draft => "draft",
        }
    }

    /// Parse a stored status
    pub fn from_db(value: &str) -> Option<Self> {
        value.parse().ok()
    }
}

impl FromStr for ListingStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" | "actief" => Ok(Self::Active),
            "paused" | "gepauzeerd" => Ok(Self::Paused),
            "sold" | "verkocht" => Ok(Self::Sold),
            "draft" => Ok(Self::Draft),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing entity
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    /// Item condition ("nieuw", "gebruikt", ...)
    pub state: Option<String>,
    pub allow_offers: bool,
    pub images: Vec<String>,
    pub main_photo: Option<String>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    /// Legacy category/subcategory id list, still consulted by filters
    pub categories: Vec<i64>,
    pub is_business_seller: bool,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Create a new active listing
    pub fn new(id: Uuid, seller_id: Uuid, title: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            seller_id,
            title,
            description: None,
            price: None,
            location: None,
            state: None,
            allow_offers: false,
            images: Vec::new(),
            main_photo: None,
            category_id: None,
            subcategory_id: None,
            categories: Vec::new(),
            is_business_seller: false,
            status: ListingStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Photo shown on cards: explicit main photo, else the first image
    pub fn cover_photo(&self) -> Option<&str> {
        self.main_photo
            .as_deref()
            .or_else(|| self.images.first().map(String::as_str))
    }

    #[inline]
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.seller_id == user_id
    }

    /// Legacy `categories` array: the category then the subcategory
    pub fn category_ids(&self) -> Vec<i64> {
        [self.category_id, self.subcategory_id].into_iter().flatten().collect()
    }

    /// Whether the listing sits in the given category or subcategory
    pub fn in_category(&self, id: i64) -> bool {
        self.category_id == Some(id) || self.subcategory_id == Some(id) || self.categories.contains(&id)
    }
}

/// Partial listing update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub state: Option<String>,
    pub allow_offers: Option<bool>,
    pub images: Option<Vec<String>>,
    pub main_photo: Option<String>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub status: Option<ListingStatus>,
}

impl ListingPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Listing {
    /// Apply a patch and bump `updated_at`
    pub fn apply(&mut self, patch: ListingPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(price) = patch.price {
            self.price = Some(price);
        }
        if let Some(location) = patch.location {
            self.location = Some(location);
        }
        if let Some(state) = patch.state {
            self.state = Some(state);
        }
        if let Some(allow_offers) = patch.allow_offers {
            self.allow_offers = allow_offers;
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
        if let Some(main_photo) = patch.main_photo {
            self.main_photo = Some(main_photo);
        }
        let recategorized = patch.category_id.is_some() || patch.subcategory_id.is_some();
        if let Some(category_id) = patch.category_id {
            self.category_id = Some(category_id);
        }
        if let Some(subcategory_id) = patch.subcategory_id {
            self.subcategory_id = Some(subcategory_id);
        }
        if recategorized {
            self.categories = self.category_ids();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ListingStatus::Active.db_value(), "actief");
        assert_eq!(ListingStatus::Paused.db_value(), "gepauzeerd");
        assert_eq!(ListingStatus::Sold.db_value(), "verkocht");
        assert_eq!(ListingStatus::Draft.db_value(), "draft");

        assert_eq!(ListingStatus::from_db("verkocht"), Some(ListingStatus::Sold));
        assert_eq!("Paused".parse::<ListingStatus>(), Ok(ListingStatus::Paused));
        assert!("archived".parse::<ListingStatus>().is_err());
    }

    #[test]
    fn test_status_serde_uses_wire_names() {
        let json = serde_json::to_string(&ListingStatus::Sold).unwrap();
        assert_eq!(json, "\"sold\"");
    }

    #[test]
    fn test_cover_photo() {
        let mut listing = Listing::new(Uuid::new_v4(), Uuid::new_v4(), "Racefiets".to_string());
        assert!(listing.cover_photo().is_none());

        listing.images = vec!["a.jpg".to_string(), "b.jpg".to_string()];
        assert_eq!(listing.cover_photo(), Some("a.jpg"));

        listing.main_photo = Some("main.jpg".to_string());
        assert_eq!(listing.cover_photo(), Some("main.jpg"));
    }

    #[test]
    fn test_in_category() {
        let mut listing = Listing::new(Uuid::new_v4(), Uuid::new_v4(), "Tafel".to_string());
        listing.category_id = Some(3);
        listing.categories = vec![42];
        assert!(listing.in_category(3));
        assert!(listing.in_category(42));
        assert!(!listing.in_category(7));
    }

    #[test]
    fn test_apply_patch() {
        let mut listing = Listing::new(Uuid::new_v4(), Uuid::new_v4(), "Stoel".to_string());
        listing.price = Some(10.0);
        let before = listing.updated_at;

        listing.apply(ListingPatch {
            title: Some("Stoelen".to_string()),
            status: Some(ListingStatus::Sold),
            ..ListingPatch::default()
        });

        assert_eq!(listing.title, "Stoelen");
        assert_eq!(listing.status, ListingStatus::Sold);
        assert_eq!(listing.price, Some(10.0));
        assert!(listing.updated_at >= before);
        assert!(ListingPatch::default().is_empty());
    }

    #[test]
    fn test_apply_recategorize_rebuilds_legacy_ids() {
        let mut listing = Listing::new(Uuid::new_v4(), Uuid::new_v4(), "Kast".to_string());
        listing.category_id = Some(3);
        listing.subcategory_id = Some(30);
        listing.categories = listing.category_ids();

        listing.apply(ListingPatch {
            subcategory_id: Some(31),
            ..ListingPatch::default()
        });
        assert_eq!(listing.categories, vec![3, 31]);

        listing.apply(ListingPatch {
            category_id: Some(7),
            subcategory_id: Some(70),
            ..ListingPatch::default()
        });
        assert_eq!(listing.categories, vec![7, 70]);
        assert!(!listing.in_category(3));
        assert!(!listing.in_category(31));
        assert!(listing.in_category(70));

        listing.apply(ListingPatch {
            title: Some("Kleerkast".to_string()),
            ..ListingPatch::default()
        });
        assert_eq!(listing.categories, vec![7, 70]);
    }
}
