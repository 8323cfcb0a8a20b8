//! Submit an accessibility point.

use accessnav_cli::coords::parse_coordinate;
use accessnav_core::{CreatePointRequest, HazardType};
use accessnav_sdk::AccessNavClient;
use clap::Parser;

/// Submit an accessibility point to the navigation server
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Server URL
    #[arg(long, default_value = "http://localhost:5001")]
    url: String,

    /// Position as "lat,lng"
    #[arg(long, allow_hyphen_values = true)]
    at: String,

    /// Point type (ramp, elevator, hazard, accessible_restroom, missing_curb_cut, step_free_entrance)
    #[arg(long = "type")]
    point_type: HazardType,

    /// Free-text description
    #[arg(long)]
    description: Option<String>,

    /// Photo URL
    #[arg(long)]
    image_url: Option<String>,

    /// Bearer token for servers running with JWT_SECRET
    #[arg(long, env = "ACCESSNAV_TOKEN")]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let location = parse_coordinate(&args.at)?;

    let mut client = AccessNavClient::new(&args.url);
    if let Some(token) = args.token {
        client = client.with_token(token);
    }

    let id = client
        .submit_point(&CreatePointRequest {
            lat: location.lat,
            lng: location.lng,
            point_type: args.point_type.as_str().to_string(),
            description: args.description,
            image_url: args.image_url,
            source: Some("cli".to_string()),
        })
        .await?;

    println!("Submitted {} point {} at {}", args.point_type, id, location);
    Ok(())
}
