//! Print a development JWT for a server running with JWT_SECRET.

use accessnav_cli::generate_dev_token;
use clap::Parser;

/// Generate a bearer token for the navigation API
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// User id placed in the `sub` claim
    #[arg(long)]
    user: String,

    /// Shared secret (must match the server's JWT_SECRET)
    #[arg(long, env = "JWT_SECRET")]
    secret: String,

    /// Validity in hours
    #[arg(long, default_value_t = 24)]
    hours: i64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    println!("{}", generate_dev_token(&args.user, &args.secret, args.hours)?);
    Ok(())
}
