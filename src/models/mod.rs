use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;

pub mod watchlist;

pub use watchlist::WatchlistEntry;

/// Media namespace tag for catalog items
///
/// Raw catalog ids are only unique within one namespace: a movie and a TV show
/// can share the same numeric id. Identity everywhere in this crate is the
/// (id, media_type) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Parses a query/path parameter, returning `None` for anything that is not
    /// a movie or TV tag (the upstream multi-search also returns "person" rows).
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(MediaType::Movie),
            "tv" => Some(MediaType::Tv),
            _ => None,
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::Tv => write!(f, "tv"),
        }
    }
}

/// Media-type filter accepted by the trending feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendingType {
    All,
    Movie,
    Tv,
}

impl TrendingType {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "all" => Some(TrendingType::All),
            "movie" => Some(TrendingType::Movie),
            "tv" => Some(TrendingType::Tv),
            _ => None,
        }
    }
}

impl Display for TrendingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendingType::All => write!(f, "all"),
            TrendingType::Movie => write!(f, "movie"),
            TrendingType::Tv => write!(f, "tv"),
        }
    }
}

/// Aggregation window for the trending feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeWindow {
    Day,
    Week,
}

impl TimeWindow {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "day" => Some(TimeWindow::Day),
            "week" => Some(TimeWindow::Week),
            _ => None,
        }
    }
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeWindow::Day => write!(f, "day"),
            TimeWindow::Week => write!(f, "week"),
        }
    }
}

/// Genre id + display name
///
/// Genre lists are fetched once per media type and treated as immutable for the
/// session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Response shape of the genre list endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreList {
    pub genres: Vec<Genre>,
}

/// One page of a paginated catalog response
///
/// A next page exists iff `page < total_pages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedPage<T> {
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u64,
}

impl<T> PaginatedPage<T> {
    /// The canonical empty page returned without consulting the upstream
    /// (e.g., a blank search query).
    pub fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

/// A movie or TV show row as it appears in list, search, and trending feeds
///
/// Movies carry `title`/`release_date`, shows carry `name`/`first_air_date`.
/// The upstream omits `media_type` on single-namespace endpoints and emits
/// values like "person" on multi-search, so the tag is optional and unknown
/// tags deserialize as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_ids: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<Genre>>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_media_type")]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub adult: bool,
}

impl MediaItem {
    /// Display name regardless of namespace (movie "title" vs show "name")
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    /// Release date for movies, first-air date for shows
    pub fn date(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
    }

    /// Composite identity; rows without a tag default to the movie namespace
    pub fn media_key(&self) -> (MediaType, u64) {
        (self.media_type.unwrap_or(MediaType::Movie), self.id)
    }
}

/// Accepts absent, null, or unrecognized media-type tags as `None`
fn lenient_media_type<'de, D>(deserializer: D) -> Result<Option<MediaType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(MediaType::from_param))
}

/// Production company credit on a detail record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: u64,
    #[serde(default)]
    pub logo_path: Option<String>,
    pub name: String,
    #[serde(default)]
    pub origin_country: String,
}

/// Spoken language on a detail record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpokenLanguage {
    #[serde(default)]
    pub english_name: String,
    #[serde(default)]
    pub iso_639_1: String,
    #[serde(default)]
    pub name: String,
}

/// Movie detail record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub revenue: Option<u64>,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub adult: bool,
}

/// TV show detail record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvShow {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub first_air_date: String,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub in_production: Option<bool>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
}

/// Cast entry in a credits response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: u32,
}

/// Crew entry in a credits response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Cast and crew for one title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    pub id: u64,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// Trailer or clip attached to a title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub video_type: String,
    #[serde(default)]
    pub official: bool,
    #[serde(default)]
    pub published_at: String,
}

/// Videos attached to one title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoList {
    pub id: u64,
    #[serde(default)]
    pub results: Vec<Video>,
}
