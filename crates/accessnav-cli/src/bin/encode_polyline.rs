//! Encode coordinates as a polyline, or decode one back.

use accessnav_cli::coords::parse_coordinate;
use accessnav_core::polyline;
use clap::Parser;

/// Encode "lat,lng" points into a polyline string
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Points as "lat,lng", in path order
    #[arg(allow_hyphen_values = true)]
    points: Vec<String>,

    /// Decode this polyline instead and print one "lat,lng" per line
    #[arg(long, conflicts_with = "points")]
    decode: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(encoded) = args.decode {
        for point in polyline::decode(&encoded)? {
            println!("{}", point);
        }
        return Ok(());
    }

    if args.points.is_empty() {
        anyhow::bail!("at least one point is required");
    }
    let path = args
        .points
        .iter()
        .map(|raw| parse_coordinate(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;
    println!("{}", polyline::encode(&path));
    Ok(())
}
