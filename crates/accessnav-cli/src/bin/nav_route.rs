//! Request an accessible route and print the warnings found along it.

use accessnav_cli::coords::location_value;
use accessnav_sdk::{AccessNavClient, RoutePreferences, RouteRequestBody};
use clap::Parser;

/// Compute a route through the navigation server
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Server URL
    #[arg(long, default_value = "http://localhost:5001")]
    url: String,

    /// Origin as "lat,lng" or an address
    #[arg(long)]
    from: String,

    /// Destination as "lat,lng" or an address
    #[arg(long)]
    to: String,

    /// Travel mode: walking, transit or driving
    #[arg(long, default_value = "walking")]
    mode: String,

    /// Allow routes with stairs
    #[arg(long)]
    allow_stairs: bool,

    /// Do not request wheelchair-accessible transit
    #[arg(long)]
    any_transit: bool,

    /// Print the full JSON response
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = AccessNavClient::new(&args.url);

    let request = RouteRequestBody {
        origin: Some(location_value(&args.from)),
        destination: Some(location_value(&args.to)),
        preferences: Some(RoutePreferences {
            mode: Some(args.mode.clone()),
            avoid_stairs: Some(!args.allow_stairs),
            wheelchair_accessible_transit: Some(!args.any_transit),
        }),
    };

    let response = client.compute_route(&request).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("Route status: {}", response.result.status);
    println!("Routes returned: {}", response.result.routes.len());

    let warnings = &response.custom_accessibility_warnings;
    if warnings.is_empty() {
        println!("No accessibility warnings along the route.");
    } else {
        println!("{} accessibility warning(s):", warnings.len());
        for warning in warnings {
            println!(
                "  [{}] {} at ({:.5}, {:.5}) - {}",
                warning.hazard_type,
                warning.id,
                warning.location.lat,
                warning.location.lng,
                warning.description
            );
        }
    }

    Ok(())
}
