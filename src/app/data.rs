use serde::{Deserialize, Serialize};

/// One TVmaze show record. Field names follow the API so favorites can be
/// written back in the same shape they were fetched in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub image: Option<ShowImage>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub premiered: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<Network>,
    #[serde(
        default,
        rename = "officialSite",
        skip_serializing_if = "Option::is_none"
    )]
    pub official_site: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(default)]
    pub average: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowImage {
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub original: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    #[serde(default)]
    pub name: String,
}

impl Show {
    pub fn rating_average(&self) -> Option<f64> {
        self.rating.as_ref().and_then(|r| r.average)
    }

    pub fn thumb_url(&self) -> Option<&str> {
        self.image
            .as_ref()
            .and_then(|i| i.medium.as_deref())
            .filter(|u| !u.is_empty())
    }

    /// Full-size artwork, falling back to the thumbnail.
    pub fn original_url(&self) -> Option<&str> {
        self.image
            .as_ref()
            .and_then(|i| i.original.as_deref())
            .filter(|u| !u.is_empty())
            .or_else(|| self.thumb_url())
    }

    pub fn has_genre(&self, tag: &str) -> bool {
        self.genres.iter().any(|g| g == tag)
    }

    pub fn rating_label(&self) -> String {
        match self.rating_average() {
            Some(avg) if avg > 0.0 => format!("{avg:.1}"),
            _ => "N/A".to_string(),
        }
    }
}
