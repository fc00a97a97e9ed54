//! Request side of the gateway: typed operations and their HTTP form.
//!
//! The state machine only ever produces [`ApiRequest`] values tagged with a
//! [`RequestId`]. [`Gateway::build`] turns them into an [`HttpRequest`] the
//! plugin shim can hand to Zellij's `web_request`, with a context map that
//! lets the response find its way back to the pending request.

use super::trace::TraceContext;
use crate::domain::{CinematchError, Result, SessionId};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

const REQUEST_ID_KEY: &str = "request_id";
const OPERATION_KEY: &str = "operation";

/// Monotonically increasing identifier of an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The four remote operations of the recommendation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Search,
    MovieDetails,
    Recommend,
    Feedback,
}

impl Operation {
    /// Endpoint path segment, also used as the operation's wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::MovieDetails => "movie_details",
            Self::Recommend => "recommend",
            Self::Feedback => "feedback",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "search" => Some(Self::Search),
            "movie_details" => Some(Self::MovieDetails),
            "recommend" => Some(Self::Recommend),
            "feedback" => Some(Self::Feedback),
            _ => None,
        }
    }

    /// Whether the UI shows the loading indicator while this operation runs.
    ///
    /// Feedback is fire-and-forget and never blocks.
    #[must_use]
    pub const fn blocks_ui(self) -> bool {
        !matches!(self, Self::Feedback)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed call against the recommendation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    /// `GET /search?query=..`
    Search { query: String },

    /// `GET /movie_details?movie=..`
    MovieDetails { title: String },

    /// `GET /recommend?movie=..&user_id=..`
    Recommend { title: String, user_id: SessionId },

    /// `POST /feedback` with a JSON body.
    Feedback {
        title: String,
        user_id: SessionId,
        liked: bool,
    },
}

/// Generates convenience constructors for `ApiRequest` variants.
macro_rules! api_request_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl ApiRequest {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " request")]
                #[must_use]
                pub fn $builder_name($($field: impl Into<$ty>),*) -> Self {
                    Self::$variant {
                        $($field: $field.into(),)*
                    }
                }
            )*
        }
    };
}

api_request_builders! {
    search(Search { query: String }),
    movie_details(MovieDetails { title: String }),
    recommend(Recommend { title: String, user_id: SessionId }),
    feedback(Feedback { title: String, user_id: SessionId, liked: bool }),
}

impl ApiRequest {
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Search { .. } => Operation::Search,
            Self::MovieDetails { .. } => Operation::MovieDetails,
            Self::Recommend { .. } => Operation::Recommend,
            Self::Feedback { .. } => Operation::Feedback,
        }
    }
}

/// An [`ApiRequest`] paired with the id the state machine tracks it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    pub id: RequestId,
    pub request: ApiRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Fully-built HTTP request, ready for `web_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    /// Echoed back verbatim by the host with the result.
    pub context: BTreeMap<String, String>,
}

/// Routing information carried through the host with each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub id: RequestId,
    pub operation: Operation,
    pub trace_context: Option<TraceContext>,
}

impl RequestContext {
    #[must_use]
    pub const fn new(id: RequestId, operation: Operation) -> Self {
        Self {
            id,
            operation,
            trace_context: None,
        }
    }

    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert(REQUEST_ID_KEY.to_string(), self.id.0.to_string());
        map.insert(OPERATION_KEY.to_string(), self.operation.name().to_string());
        if let Some(trace_context) = &self.trace_context {
            trace_context.write_to(&mut map);
        }
        map
    }

    /// Parses a context map echoed by the host; `None` if it was not ours.
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Option<Self> {
        let id = map.get(REQUEST_ID_KEY)?.parse::<u64>().ok()?;
        let operation = Operation::from_name(map.get(OPERATION_KEY)?)?;
        Some(Self {
            id: RequestId(id),
            operation,
            trace_context: TraceContext::read_from(map),
        })
    }
}

/// Builds HTTP requests against the configured service base URL.
#[derive(Debug, Clone)]
pub struct Gateway {
    base_url: Url,
}

impl Gateway {
    /// Validates the service base URL.
    ///
    /// # Errors
    ///
    /// Returns [`CinematchError::Config`] if the URL does not parse or cannot
    /// carry path segments (e.g. `mailto:`).
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url.trim())
            .map_err(|e| CinematchError::Config(format!("invalid api_url {base_url:?}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(CinematchError::Config(format!(
                "api_url {base_url:?} cannot be used as a base URL"
            )));
        }
        Ok(Self { base_url: parsed })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the HTTP form of an outgoing request.
    ///
    /// # Errors
    ///
    /// Returns [`CinematchError::Config`] if the endpoint URL cannot be
    /// derived from the base URL.
    pub fn build(&self, outgoing: &OutgoingRequest, trace_context: Option<TraceContext>) -> Result<HttpRequest> {
        let operation = outgoing.request.operation();
        let mut url = self.endpoint(operation)?;
        let mut headers = BTreeMap::new();
        let mut body = Vec::new();

        match &outgoing.request {
            ApiRequest::Search { query } => {
                url.query_pairs_mut().append_pair("query", query);
            }
            ApiRequest::MovieDetails { title } => {
                url.query_pairs_mut().append_pair("movie", title);
            }
            ApiRequest::Recommend { title, user_id } => {
                url.query_pairs_mut()
                    .append_pair("movie", title)
                    .append_pair("user_id", user_id.as_str());
            }
            ApiRequest::Feedback { title, user_id, liked } => {
                headers.insert("Content-Type".to_string(), "application/json".to_string());
                body = serde_json::json!({
                    "user_id": user_id.as_str(),
                    "movie_title": title,
                    "liked": liked,
                })
                .to_string()
                .into_bytes();
            }
        }

        let method = match operation {
            Operation::Feedback => HttpMethod::Post,
            Operation::Search | Operation::MovieDetails | Operation::Recommend => HttpMethod::Get,
        };

        let context = RequestContext {
            id: outgoing.id,
            operation,
            trace_context,
        }
        .to_map();

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers,
            body,
            context,
        })
    }

    fn endpoint(&self, operation: Operation) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| CinematchError::Config("api_url cannot be used as a base URL".to_string()))?
            .pop_if_empty()
            .push(operation.name());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outgoing(request: ApiRequest) -> OutgoingRequest {
        OutgoingRequest {
            id: RequestId(7),
            request,
        }
    }

    #[test]
    fn search_encodes_the_query_parameter() {
        let gateway = Gateway::new("http://localhost:5000").unwrap();
        let http = gateway
            .build(&outgoing(ApiRequest::search("a b&c")), None)
            .unwrap();
        assert_eq!(http.method, HttpMethod::Get);
        assert_eq!(http.url, "http://localhost:5000/search?query=a+b%26c");
        assert!(http.body.is_empty());
    }

    #[test]
    fn endpoints_are_appended_to_the_base_path() {
        let gateway = Gateway::new("https://example.org/api/").unwrap();
        let http = gateway
            .build(&outgoing(ApiRequest::movie_details("Alpha")), None)
            .unwrap();
        assert_eq!(http.url, "https://example.org/api/movie_details?movie=Alpha");

        let no_slash = Gateway::new(" https://example.org/api?stale=1 ").unwrap();
        assert_eq!(no_slash.base_url().as_str(), "https://example.org/api?stale=1");
        let http = no_slash
            .build(
                &outgoing(ApiRequest::recommend("Alpha", SessionId::from("user_abc".to_string()))),
                None,
            )
            .unwrap();
        assert_eq!(http.url, "https://example.org/api/recommend?movie=Alpha&user_id=user_abc");
    }

    #[test]
    fn feedback_posts_a_json_body() {
        let gateway = Gateway::new("http://localhost:5000").unwrap();
        let http = gateway
            .build(
                &outgoing(ApiRequest::feedback("Alpha", SessionId::from("user_abc".to_string()), true)),
                None,
            )
            .unwrap();
        assert_eq!(http.method, HttpMethod::Post);
        assert_eq!(http.url, "http://localhost:5000/feedback");
        assert_eq!(http.headers.get("Content-Type").map(String::as_str), Some("application/json"));

        let body: serde_json::Value = serde_json::from_slice(&http.body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"user_id": "user_abc", "movie_title": "Alpha", "liked": true})
        );
    }

    #[test]
    fn context_survives_the_host_round_trip() {
        let gateway = Gateway::new("http://localhost:5000").unwrap();
        let trace = TraceContext {
            trace_id: "0af7651916cd43dd8448eb211c80319c".to_string(),
            parent_span_id: "b7ad6b7169203331".to_string(),
        };
        let http = gateway
            .build(&outgoing(ApiRequest::search("ab")), Some(trace.clone()))
            .unwrap();

        let context = RequestContext::from_map(&http.context).unwrap();
        assert_eq!(context.id, RequestId(7));
        assert_eq!(context.operation, Operation::Search);
        assert_eq!(context.trace_context, Some(trace));
    }

    #[test]
    fn foreign_context_maps_are_rejected() {
        let mut map = BTreeMap::new();
        map.insert("request_id".to_string(), "nope".to_string());
        map.insert("operation".to_string(), "search".to_string());
        assert!(RequestContext::from_map(&map).is_none());
        assert!(RequestContext::from_map(&BTreeMap::new()).is_none());
    }

    #[test]
    fn invalid_base_urls_are_config_errors() {
        assert!(matches!(Gateway::new("not a url"), Err(CinematchError::Config(_))));
        assert!(matches!(Gateway::new("mailto:someone@example.org"), Err(CinematchError::Config(_))));
    }
}
