//! BenChess interactive console

use ben_chess::console::Console;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    println!("BenChess - enter a move (e.g. e2-e4), or press enter to let the engine play");
    println!("Commands: moves, d, new, key <code>, depth <n>, perft <n>, quit");

    let mut console = Console::new();
    if let Err(e) = console.run() {
        eprintln!("console error: {e}");
        std::process::exit(1);
    }
}
