use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use family_tree_generator::export;
use family_tree_generator::menu;
use family_tree_generator::tables::loader;
use family_tree_generator::{FamilyTree, TreeConfig};

#[derive(Parser, Debug)]
#[command(name = "family_tree")]
#[command(about = "Generate a family tree from demographic tables")]
struct Args {
    /// Directory holding the demographic CSV files
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON file overriding generation settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Export the generated tree as JSON (e.g., "tree.json")
    #[arg(long)]
    export: Option<PathBuf>,

    /// Print a summary and exit instead of opening the menu
    #[arg(long)]
    no_menu: bool,

    /// Log every expansion step
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: could not install logger: {}", e);
    }

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}

fn run(args: Args) -> family_tree_generator::Result<()> {
    let config = match &args.config {
        Some(path) => TreeConfig::from_json_file(path)?,
        None => TreeConfig::default(),
    };

    println!("Reading files...");
    let tables = loader::load_tables(&args.data_dir)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    println!("Generating family tree with seed: {}", seed);
    let tree = FamilyTree::generate(&tables, &config, &mut rng)?;
    let (a, b) = tree.root_surnames();
    println!("Founded by the {} and {} lines, {} people in the tree", a, b, tree.total_people());

    if let Some(path) = &args.export {
        export::export_json(&tree, Some(seed), path)?;
        println!("Exported tree to {}", path.display());
    }

    if args.no_menu {
        print!("{}", tree.summary());
        return Ok(());
    }

    let stdin = io::stdin();
    menu::run_menu(&tree, stdin.lock(), io::stdout()).map_err(|source| {
        family_tree_generator::FamilyTreeError::Io {
            path: PathBuf::from("<stdin>"),
            source,
        }
    })
}
