//! Room client
//!
//! Client side of joining a room: route handling, token fetch, join state,
//! and the lifetime of the session handed to the external real-time engine.
//!
//! ```rust,ignore
//! let route = RoomRoute::parse("/room/team-sync?name=alice")?;
//! match route.decision() {
//!     RouteDecision::Join(request) => {
//!         let client = TokenClient::new("http://localhost:3000")?;
//!         let mut flow = JoinFlow::new(request.room(), client, engine);
//!         flow.submit(request.name()).await?;
//!     }
//!     RouteDecision::Redirect(landing) => navigate(&landing),
//! }
//! ```

pub mod client;
pub mod errors;
pub mod flow;
pub mod join;
pub mod session;
pub mod state;

pub use client::{RoomGrant, TokenClient};
pub use errors::ClientError;
pub use flow::JoinFlow;
pub use join::{room_path, JoinRequest, RoomRoute, RouteDecision};
pub use session::{RealtimeEngine, RoomSession};
pub use state::JoinState;
