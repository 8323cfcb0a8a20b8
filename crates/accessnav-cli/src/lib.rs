//! Command line tools for the accessible navigation API.
//!
//! Binaries:
//! - nav_route: request a route and print its accessibility warnings
//! - add_point: submit an accessibility point
//! - encode_polyline: encode `lat,lng` pairs as a polyline
//! - generate_token: mint a development JWT for servers with `JWT_SECRET`

pub mod auth;
pub mod coords;

pub use auth::generate_dev_token;
