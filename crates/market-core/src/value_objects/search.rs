//! Search query normalization, synonym expansion, and sort orders

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum number of expanded terms used for a listing search
pub const MAX_SEARCH_TERMS: usize = 15;

/// Maximum number of expanded terms used for suggestions
pub const MAX_SUGGEST_TERMS: usize = 10;

/// Keyword -> synonyms. A query containing the keyword also matches every synonym.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("auto", &["auto", "wagen", "personenwagen", "auto's", "wagens", "voertuig", "voertuigen"]),
    ("personenwagen", &["personenwagen", "personenwagens", "auto", "wagen", "sedan", "hatchback", "stationwagen"]),
    ("bestelwagen", &["bestelwagen", "bestelwagens", "busje", "busjes", "van", "transporter"]),
    ("oldtimer", &["oldtimer", "oldtimers", "klassieker", "klassiekers", "vintage auto"]),
    ("motorfiets", &["motorfiets", "motorfietsen", "motor", "motors", "motorrijwiel"]),
    ("fiets", &["fiets", "fietsen", "rijwiel", "rijwielen", "tweewieler"]),
    ("stadsfiets", &["stadsfiets", "stadsfietsen", "city bike", "citybike"]),
    ("racefiets", &["racefiets", "racefietsen", "koersfiets", "koersfietsen", "road bike", "roadbike", "wegfiets"]),
    ("koersfiets", &["koersfiets", "koersfietsen", "racefiets", "racefietsen"]),
    ("mountainbike", &["mountainbike", "mountainbikes", "mtb", "bergfiets", "bergfietsen"]),
    ("mtb", &["mtb", "mountainbike", "mountainbikes", "bergfiets"]),
    ("ebike", &["e-bike", "ebike", "e bike", "elektrische fiets", "elektrische fietsen", "e-fiets"]),
    ("e bike", &["e-bike", "ebike", "elektrische fiets", "elektrische fietsen"]),
    ("brommer", &["brommer", "brommers", "scooter", "scooters", "bromfiets"]),
    ("meubel", &["meubel", "meubels", "meubilair"]),
    ("verlichting", &["verlichting", "lamp", "lampen", "licht", "spots", "led"]),
    ("huishoudtoestellen", &["huishoudtoestellen", "wasmachine", "droger", "koelkast", "oven", "magnetron"]),
    ("tuinmeubelen", &["tuinmeubelen", "tuin meubels", "buitenmeubels", "tuinstoelen"]),
    ("bbq", &["bbq", "barbecue", "grill", "buitenkeuken"]),
    ("televisie", &["televisie", "tv", "televisies", "beeldscherm", "smart tv"]),
    ("audio", &["audio", "hifi", "hi-fi", "speakers", "boxen"]),
    ("koptelefoon", &["koptelefoon", "koptelefoons", "headphones", "headset", "oortjes", "earbuds"]),
    ("camera", &["camera", "camera's", "fotocamera", "videocamera"]),
    ("laptop", &["laptop", "laptops", "notebook", "notebooks"]),
    ("desktop", &["desktop", "desktops", "pc", "computer"]),
    ("smartphone", &["smartphone", "smartphones", "telefoon", "telefoons", "gsm"]),
    ("gsm", &["gsm", "smartphone", "telefoon", "mobiel"]),
    ("tablet", &["tablet", "tablets", "ipad"]),
    ("schoenen", &["schoenen", "schoen", "laarzen", "sneakers", "boots"]),
    ("kinderwagen", &["kinderwagen", "kinderwagens", "buggy", "wandelwagen"]),
    ("speelgoed", &["speelgoed", "speelspullen", "lego"]),
    ("boeken", &["boeken", "boek", "literatuur", "leesboek"]),
    ("muziekinstrumenten", &["muziekinstrumenten", "instrumenten", "gitaar", "piano", "drum", "viool"]),
    ("console", &["console", "consoles", "playstation", "xbox", "nintendo", "switch"]),
    ("games", &["games", "spelletjes", "videogames", "computerspel"]),
    ("gereedschap", &["gereedschap", "gereedschappen", "boormachine", "zaag", "hamer"]),
    ("caravan", &["caravan", "camper", "mobilhome"]),
    ("boot", &["boot", "boten", "zeilboot", "motorboot"]),
    ("gratis", &["gratis", "kosteloos", "voor niets", "weggeven", "free"]),
    ("tweedehands", &["tweedehands", "second hand", "gebruikt", "gebruikte", "used"]),
    ("gebruikt", &["gebruikt", "tweedehands", "second hand", "gebruikte", "used"]),
    ("nieuw", &["nieuw", "nieuwe", "nieuwstaat", "new"]),
    ("vintage", &["vintage", "retro", "klassiek", "antiek"]),
    ("goedkoop", &["goedkoop", "goedkope", "betaalbaar", "budget", "cheap"]),
];

/// Lowercase, treat `-` and `_` as spaces, collapse whitespace
pub fn normalize_query(raw: &str) -> String {
    raw.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Expand a normalized query into at most `max` distinct search terms
///
/// Order: the full query, its tokens, then synonyms of every keyword the query
/// contains. LIKE metacharacters are stripped, and terms left with one
/// character or less are dropped.
pub fn expand_terms(normalized: &str, max: usize) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    let mut push = |term: &str| {
        let term = escape_like(term);
        let term = term.trim();
        if term.chars().count() > 1 && !terms.iter().any(|t| t == term) {
            terms.push(term.to_string());
        }
    };

    push(normalized);
    for token in normalized.split_whitespace() {
        push(token);
    }
    for (keyword, synonyms) in SYNONYMS {
        if normalized.contains(keyword) {
            for synonym in *synonyms {
                push(synonym);
            }
        }
    }

    terms.truncate(max);
    terms
}

/// Strip LIKE metacharacters from a user term
pub fn escape_like(term: &str) -> String {
    term.replace(['%', '_', '\\'], "")
}

/// `%term%` pattern for ILIKE matching; `None` when nothing survives escaping
pub fn contains_pattern(term: &str) -> Option<String> {
    let escaped = escape_like(term);
    let escaped = escaped.trim();
    (!escaped.is_empty()).then(|| format!("%{escaped}%"))
}

/// Listing search sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSort {
    Relevance,
    #[default]
    DateDesc,
    DateAsc,
    PriceAsc,
    PriceDesc,
}

impl SearchSort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::DateDesc => "date_desc",
            Self::DateAsc => "date_asc",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
        }
    }

    /// SQL ORDER BY clause; relevance has no ranking column and orders newest first
    pub fn order_by(self) -> &'static str {
        match self {
            Self::PriceAsc => "price ASC NULLS LAST, created_at DESC",
            Self::PriceDesc => "price DESC NULLS LAST, created_at DESC",
            Self::DateAsc => "created_at ASC",
            Self::Relevance | Self::DateDesc => "created_at DESC",
        }
    }

    /// Parse leniently; unknown values fall back to the default
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for SearchSort {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "relevance" => Ok(Self::Relevance),
            "date_desc" => Ok(Self::DateDesc),
            "date_asc" => Ok(Self::DateAsc),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SearchSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business directory sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessSort {
    #[default]
    Relevance,
    RatingDesc,
    ReviewsDesc,
    NameAsc,
}

impl FromStr for BusinessSort {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "relevance" => Ok(Self::Relevance),
            "rating_desc" => Ok(Self::RatingDesc),
            "reviews_desc" => Ok(Self::ReviewsDesc),
            "name_asc" => Ok(Self::NameAsc),
            _ => Err(()),
        }
    }
}

impl BusinessSort {
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

/// How the business directory interprets `q`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessSearchMode {
    /// Match company or shop names
    #[default]
    Business,
    /// Match titles of the businesses' active listings
    Product,
}

impl BusinessSearchMode {
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("product") => Self::Product,
            _ => Self::Business,
        }
    }
}
