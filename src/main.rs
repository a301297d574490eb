use clap::Parser;
use surveyor::charts::ChartStore;
use surveyor::db::Db;
use surveyor::AppState;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// SQLite database URL.
    #[arg(env, default_value = "sqlite:surveyor.db")]
    database_url: String,

    /// Directory where generated chart images are stored.
    #[arg(short, long, env, default_value = "media")]
    media_dir: std::path::PathBuf,

    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:1414")]
    address: String,

    /// Set the Secure attribute on issued cookies.
    #[arg(long, env, default_value_t = false)]
    secure_cookies: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tracing=info,surveyor=debug".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();

    let db = Db::new(&args.database_url).await?;
    let state = AppState {
        db,
        charts: ChartStore::new(&args.media_dir),
        secure_cookies: args.secure_cookies,
    };
    let router = surveyor::router(state);

    let address = args.address.parse::<std::net::SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!("listening on {address}");
    axum::serve(listener, router).await?;

    Ok(())
}
