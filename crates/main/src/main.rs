use std::error::Error;
use std::path::PathBuf;

use ancoras_pdf::generate::{self, GenerateOptions, Progress};
use ancoras_pdf::layout::LayoutConfig;
use ancoras_pdf::loader::{BuiltinSource, FontDirSource, Loader};
use ancoras_pdf::sink::DirectorySink;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn, LevelFilter};
use tokio::sync::mpsc;

/// Generates the "A Regra das 3 Ancoras" prayer guide as a PDF.
///
/// The `fonts` backend expects `Roboto-{Regular,Bold,Italic,BoldItalic}.ttf` under
/// `--fonts-dir`, `ANCORAS_FONTS_DIR` or `assets/fonts`.
#[derive(Parser)]
#[command(author, version, about = "Prayer guide PDF generator")]
struct Cli {
    /// Log progress and pagination details (repeat for more).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the guide to `3-ancoras-guia-YYYY-MM-DD.pdf`.
    #[command(name = "generate", aliases = ["gen"])]
    Generate(GenerateArgs),

    /// Print the page every line of the guide lands on.
    #[command(name = "plan")]
    Plan {
        /// Usable page height in millimetres.
        #[arg(long, default_value_t = LayoutConfig::default().page_height)]
        page_height: f64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Standard Helvetica fonts, no font files needed.
    Builtin,
    /// Embedded TrueType fonts read from disk.
    Fonts,
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Directory receiving the PDF.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Date stamped into the file name (defaults to today, UTC).
    #[arg(long)]
    date: Option<NaiveDate>,

    #[arg(long, value_enum, default_value_t = Backend::Builtin)]
    backend: Backend,

    /// Font directory searched before the defaults (fonts backend).
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Download the font family from this base URL instead of reading it from disk.
    #[cfg(feature = "remote")]
    #[arg(long)]
    font_url: Option<String>,

    /// Add a chapter outline to the PDF.
    #[arg(long)]
    bookmarks: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Generate(args) => run_generate(args),
        Commands::Plan { page_height } => run_plan(page_height),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        _ => {
            builder.filter_level(LevelFilter::Debug);
        }
    }
    builder.init();
}

fn loader_for(args: &GenerateArgs) -> Loader {
    #[cfg(feature = "remote")]
    if let Some(url) = &args.font_url {
        return Loader::new(ancoras_pdf::loader::RemoteFontSource::new(
            url.as_str(),
            ancoras_pdf::fonts::DEFAULT_FONT_FAMILY_NAME,
        ));
    }

    match args.backend {
        Backend::Builtin => {
            if let Some(dir) = &args.fonts_dir {
                warn!(
                    "--fonts-dir {} has no effect with the builtin backend; use --backend fonts",
                    dir.display()
                );
            }
            Loader::new(BuiltinSource)
        }
        Backend::Fonts => Loader::new(FontDirSource::discover(args.fonts_dir.clone())),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let loader = loader_for(&args);
    let sink = DirectorySink::new(&args.out_dir);
    info!("Writing into {}", sink.directory().display());
    let mut options = match args.date {
        Some(date) => GenerateOptions::for_date(date),
        None => GenerateOptions::today(),
    };
    options = options.with_bookmarks(args.bookmarks);

    let generated = runtime.block_on(async {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Progress>();
        let printer = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                eprintln!("{}", event.message());
            }
        });

        let outcome = generate::generate(&loader, &options, &sink, Some(&sender)).await;
        drop(sender);
        let _ = printer.await;
        outcome
    })?;

    println!(
        "{} ({} page(s), {} bytes)",
        generated.path.display(),
        generated.pages,
        generated.bytes_len
    );
    Ok(())
}

fn run_plan(page_height: f64) -> Result<(), Box<dyn Error>> {
    let layout = LayoutConfig::default().with_page_height(page_height);
    let (canvas, summary) = generate::plan(&layout)?;
    for op in canvas.ops() {
        println!("{}", op);
    }
    println!(
        "{} page(s); chapters start on {:?}",
        summary.pages, summary.chapter_pages
    );
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
