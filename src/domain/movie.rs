//! Movie records returned by the recommendation service.
//!
//! Both records deserialize straight from the service's JSON bodies. Ratings
//! and similarity scores are fractions in `[0, 1]`; the display helpers turn
//! them into the "★ 8.0/10" and "87% match" forms shown in the UI.

use serde::{Deserialize, Serialize};

/// Details of the movie the user selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub title: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub rating: f64,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub poster_url: String,
}

/// A single recommended movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub rating: f64,
    pub similarity_score: f64,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub summary: Option<String>,
}

impl MovieDetails {
    /// Rating on a ten-point scale with one decimal, e.g. `"8.0/10"`.
    #[must_use]
    pub fn rating_label(&self) -> String {
        rating_label(self.rating)
    }
}

impl Recommendation {
    /// Rating on a ten-point scale with one decimal, e.g. `"7.5/10"`.
    #[must_use]
    pub fn rating_label(&self) -> String {
        rating_label(self.rating)
    }

    /// Similarity as a rounded percentage.
    ///
    /// ```
    /// use cinematch::domain::Recommendation;
    ///
    /// let rec = Recommendation {
    ///     title: "Heat".to_string(),
    ///     genres: vec![],
    ///     rating: 0.82,
    ///     similarity_score: 0.876,
    ///     poster_url: String::new(),
    ///     summary: None,
    /// };
    /// assert_eq!(rec.match_percent(), 88);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn match_percent(&self) -> u8 {
        (self.similarity_score.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

fn rating_label(rating: f64) -> String {
    format!("{:.1}/10", rating * 10.0)
}
