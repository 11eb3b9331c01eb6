//! Join requests and room routes.
//!
//! A room is reached at `/room/{room}?name={identity}`. The landing page is
//! `/`, optionally pre-filled with `?room={room}` when arriving from a room
//! link that carried no name.

use crate::errors::ClientError;
use url::form_urlencoded;

const ROOM_ROUTE_PREFIX: &str = "/room/";

/// A validated attempt to join `room` as `name`.
///
/// Both values are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    room: String,
    name: String,
}

impl JoinRequest {
    /// Validate a join attempt.
    ///
    /// # Errors
    ///
    /// `ClientError::MissingParameter` when either value is blank after trimming.
    pub fn new(room: &str, name: &str) -> Result<Self, ClientError> {
        let room = room.trim();
        if room.is_empty() {
            return Err(ClientError::MissingParameter("room"));
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::MissingParameter("name"));
        }

        Ok(Self {
            room: room.to_string(),
            name: name.to_string(),
        })
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Room route for this request.
    pub fn path(&self) -> String {
        room_path(&self.room, &self.name)
    }
}

/// Build `/room/{room}?name={name}` with both values percent-encoded.
pub fn room_path(room: &str, name: &str) -> String {
    format!(
        "{ROOM_ROUTE_PREFIX}{}?name={}",
        encode_path_segment(room),
        encode_query_value(name)
    )
}

/// Landing page path pre-filled with `room`.
pub fn landing_path(room: &str) -> String {
    format!("/?room={}", encode_query_value(room))
}

/// Room to pre-fill on the landing page, read from its query string.
pub fn shared_room(query: &str) -> Option<String> {
    query_value(query.trim_start_matches('?'), "room")
}

/// What to do with a room route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Enough information to join immediately.
    Join(JoinRequest),
    /// No usable name; send the user to the landing page with the room kept.
    Redirect(String),
}

/// A decoded `/room/{room}?name={name}` route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRoute {
    room: String,
    name: Option<String>,
}

impl RoomRoute {
    /// Decode a route's path and query.
    ///
    /// # Errors
    ///
    /// - `InvalidRoute` - path is not `/room/{room}`
    /// - `MissingParameter` - room segment is blank
    pub fn parse(path_and_query: &str) -> Result<Self, ClientError> {
        let without_fragment = path_and_query
            .split_once('#')
            .map_or(path_and_query, |(before, _)| before);
        let (path, query) = without_fragment
            .split_once('?')
            .unwrap_or((without_fragment, ""));

        let segment = path
            .strip_prefix(ROOM_ROUTE_PREFIX)
            .map(|rest| rest.trim_end_matches('/'))
            .filter(|rest| !rest.contains('/'))
            .ok_or_else(|| ClientError::InvalidRoute(path.to_string()))?;

        let room = decode_path_segment(segment).trim().to_string();
        if room.is_empty() {
            return Err(ClientError::MissingParameter("room"));
        }

        Ok(Self {
            room,
            name: query_value(query, "name"),
        })
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Join when a name is present, otherwise redirect to the landing page.
    pub fn decision(&self) -> RouteDecision {
        match self.name.as_deref().map(|name| JoinRequest::new(&self.room, name)) {
            Some(Ok(request)) => RouteDecision::Join(request),
            _ => {
                tracing::debug!(target: "room_client.join", "Room route has no name, redirecting");
                RouteDecision::Redirect(landing_path(&self.room))
            }
        }
    }
}

/// First non-blank value for `key`, trimmed.
fn query_value(query: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.trim().to_string())
        .find(|v| !v.is_empty())
}

fn encode_query_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

// Form encoding writes spaces as '+' and escapes a literal '+', so swapping
// '+' for "%20" yields a valid path segment.
fn encode_path_segment(value: &str) -> String {
    encode_query_value(value).replace('+', "%20")
}

// '+' is literal in a path. '&' and '=' are escaped so the form parser sees
// a single key.
fn decode_path_segment(segment: &str) -> String {
    let escaped = segment
        .replace('+', "%2B")
        .replace('&', "%26")
        .replace('=', "%3D");
    form_urlencoded::parse(escaped.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default()
}
