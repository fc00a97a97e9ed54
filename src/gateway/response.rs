//! Response side of the gateway: classifying HTTP results.
//!
//! Every response is classified by [`decode`] into exactly one of: a typed
//! success, [`CinematchError::NotFound`] for an unknown title,
//! [`CinematchError::Application`] for an error the service reported inside a
//! 2xx body, or [`CinematchError::Network`] for anything else.

use super::request::Operation;
use crate::domain::{CinematchError, MovieDetails, Recommendation, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

const MAX_ERROR_SNIPPET: usize = 120;

/// Raw result delivered by the host for a `web_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub context: BTreeMap<String, String>,
}

/// Typed success payloads, one per [`Operation`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    SearchResults(Vec<String>),
    MovieDetails(MovieDetails),
    Recommendations(Vec<Recommendation>),
    FeedbackRecorded,
}

#[derive(Debug, Deserialize)]
struct MovieDetailsEnvelope {
    #[serde(default)]
    movie: Option<MovieDetails>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecommendationsEnvelope {
    #[serde(default)]
    recommendations: Option<Vec<Recommendation>>,
    #[serde(default)]
    error: Option<String>,
}

/// Classifies the result of `operation`.
///
/// # Errors
///
/// - [`CinematchError::Network`] for non-2xx statuses and malformed bodies
/// - [`CinematchError::NotFound`] when movie details carry no movie
/// - [`CinematchError::Application`] when recommendations carry an `error`
pub fn decode(operation: Operation, status: u16, body: &[u8]) -> Result<ApiResponse> {
    ensure_success(operation, status, body)?;

    match operation {
        Operation::Search => parse::<Vec<String>>(operation, body).map(ApiResponse::SearchResults),
        Operation::MovieDetails => decode_movie_details(body).map(ApiResponse::MovieDetails),
        Operation::Recommend => decode_recommendations(body).map(ApiResponse::Recommendations),
        // The feedback acknowledgement body carries nothing the UI needs.
        Operation::Feedback => Ok(ApiResponse::FeedbackRecorded),
    }
}

fn ensure_success(operation: Operation, status: u16, body: &[u8]) -> Result<()> {
    if (200..300).contains(&status) {
        return Ok(());
    }

    let text = String::from_utf8_lossy(body);
    let snippet: String = text.trim().chars().take(MAX_ERROR_SNIPPET).collect();
    if snippet.is_empty() {
        Err(CinematchError::Network(format!("{operation} returned HTTP {status}")))
    } else {
        Err(CinematchError::Network(format!(
            "{operation} returned HTTP {status}: {snippet}"
        )))
    }
}

fn parse<T: for<'de> Deserialize<'de>>(operation: Operation, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| CinematchError::Network(format!("malformed {operation} response: {e}")))
}

fn decode_movie_details(body: &[u8]) -> Result<MovieDetails> {
    let envelope: MovieDetailsEnvelope = parse(Operation::MovieDetails, body)?;
    match envelope {
        MovieDetailsEnvelope { error: Some(error), .. } => Err(CinematchError::NotFound(error)),
        MovieDetailsEnvelope { movie: Some(movie), .. } => Ok(movie),
        MovieDetailsEnvelope { movie: None, .. } => {
            Err(CinematchError::NotFound("service returned no movie".to_string()))
        }
    }
}

fn decode_recommendations(body: &[u8]) -> Result<Vec<Recommendation>> {
    let envelope: RecommendationsEnvelope = parse(Operation::Recommend, body)?;
    match envelope {
        RecommendationsEnvelope { error: Some(error), .. } => Err(CinematchError::Application(error)),
        RecommendationsEnvelope {
            recommendations: Some(recommendations),
            ..
        } => Ok(recommendations),
        RecommendationsEnvelope { recommendations: None, .. } => Err(CinematchError::Network(
            "recommend response has neither recommendations nor error".to_string(),
        )),
    }
}
