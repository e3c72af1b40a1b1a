mod fetch;
mod serve;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "restock",
    version,
    about = "A reference-counted resource cache with pluggable backends and hot reload",
    long_about = "Restock loads opaque byte blobs from a local directory, an HTTP origin, or a \
                  built-in archive, converts them into live objects through per-extension \
                  handlers, and deduplicates them by canonical path. Loaded resources can be \
                  hot-reloaded over an embedded control server."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load resources through a factory and print their descriptors
    #[command(long_about = "Registers a raw-bytes handler for each requested extension, loads \
                            every named resource, and prints a summary per descriptor.")]
    Fetch {
        /// Resource names, relative to the base path of the URI
        #[arg(value_name = "NAME", required = true)]
        names: Vec<String>,

        /// Factory origin, e.g. file:///data or http://localhost:8080/content
        #[arg(short, long, value_name = "URI")]
        uri: String,

        /// Print machine-readable JSON summaries
        #[arg(long)]
        json: bool,
    },
    /// Run a factory with the embedded control server and keep it pumping
    #[command(long_about = "Loads the named resources, starts the control server, and drains \
                            its requests cooperatively. GET / lists loaded resources; \
                            GET /reload/<name> hot-reloads one.")]
    Serve {
        /// Resources to load before serving
        #[arg(value_name = "NAME")]
        preload: Vec<String>,

        /// Factory origin, e.g. file:///data
        #[arg(short, long, value_name = "URI")]
        uri: String,

        /// Control server port
        #[arg(short, long, default_value_t = restock_core::DEFAULT_CONTROL_PORT)]
        port: u16,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = restock_core::init_logging("cli", true);

    match cli.command {
        Commands::Fetch { names, uri, json } => fetch::run(&uri, &names, json),
        Commands::Serve { preload, uri, port } => serve::run(&uri, port, &preload),
    }
}
