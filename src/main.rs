use clap::Parser;
use image_forensics::analyzer::ExifToolAnalyzer;
use image_forensics::geo::IpApiLocator;
use image_forensics::map::TracingMap;
use image_forensics::report::ExportFormat;
use image_forensics::session::AnalysisSession;
use image_forensics::structs::AnalysisOptions;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Analyze an image file and print the forensic report.
#[derive(Parser, Debug)]
#[command(name = "image_forensics", version, about)]
struct Cli {
    /// Image file to analyze.
    image: PathBuf,

    /// Directory to write results.json / results.csv / results.txt into.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Skip metadata extraction.
    #[arg(long)]
    skip_metadata: bool,

    /// Request reverse image search (a declared non-feature; narrated only).
    #[arg(long)]
    reverse_search: bool,

    /// Do not place a map marker for extracted coordinates.
    #[arg(long)]
    no_plot: bool,

    /// Path to a specific exiftool executable.
    #[arg(long)]
    exiftool_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let analyzer = match &cli.exiftool_path {
        Some(path) => ExifToolAnalyzer::with_executable(path)?,
        None => ExifToolAnalyzer::new()?,
    };
    let mut session = AnalysisSession::builder()
        .analyzer(Box::new(analyzer))
        .locator(Box::new(IpApiLocator::new()))
        .map(Box::new(TracingMap))
        .build();

    session.load_image(std::fs::read(&cli.image)?)?;
    let outcome = session
        .start_analysis(AnalysisOptions {
            extract_metadata: !cli.skip_metadata,
            reverse_image_search: cli.reverse_search,
            plot_coordinates: !cli.no_plot,
        })
        .await;

    for event in session.progress().events() {
        println!(
            "[{}] {:?}: {}",
            event.timestamp.format("%H:%M:%S"),
            event.severity,
            event.text
        );
    }
    outcome?;

    let report = session.export(ExportFormat::Txt)?;
    println!("\n{}", report.content);

    if let Some(out_dir) = &cli.out_dir {
        std::fs::create_dir_all(out_dir)?;
        for format in [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Txt] {
            let artifact = session.export(format)?;
            let path = out_dir.join(artifact.filename);
            std::fs::write(&path, artifact.content)?;
            println!("wrote {}", path.display());
        }
    }

    Ok(())
}
