use upskill_pilot::channels::CliWalkthrough;
use upskill_pilot::config::AppConfig;
use upskill_pilot::flow::FlowSession;
use upskill_pilot::llm::create_provider;
use upskill_pilot::path::PathGenerator;
use upskill_pilot::routes::flow_routes;

#[tokio::main]
async fn main() -> upskill_pilot::error::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;

    eprintln!("🎓 Upskill Pilot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.llm.model);
    if !config.api_key_configured {
        eprintln!("   API key: placeholder (set GEMINI_API_KEY)");
    }
    eprintln!("   Flow API: http://0.0.0.0:{}/api/flow", config.http_port);

    let llm = create_provider(&config.llm)?;
    let session = FlowSession::new(PathGenerator::new(llm));

    let app = flow_routes(session.clone());
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    tracing::info!(port = config.http_port, "Flow API server started");

    if !config.interactive {
        axum::serve(listener, app).await?;
        return Ok(());
    }

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Flow API server stopped");
        }
    });

    eprintln!("   Type /quit to exit.\n");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    CliWalkthrough::new(session)
        .run(stdin, tokio::io::stdout())
        .await?;

    Ok(())
}
