mod cli;
mod craft;
mod error;
mod filter;
mod interface;
mod receive;
mod redirect;
mod rewrite;
mod rule;
mod send;
mod sockets;

use std::process;

use clap::Parser;

use crate::cli::Args;

fn main() {
    env_logger::init();

    let args = Args::parse();
    let rule = match args.translation_rule() {
        Ok(rule) => rule,
        Err(reason) => {
            eprintln!("redirector: {reason}");
            process::exit(1);
        }
    };

    if let Err(e) = redirect::run(&rule) {
        eprintln!("redirector: {e}");
        process::exit(1);
    }
}
