mod cli;
mod handlers;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    cli::run()
}
