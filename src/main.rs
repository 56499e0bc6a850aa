#[macro_use]
extern crate clap;
extern crate gpd;
#[macro_use]
extern crate log;
#[macro_use]
extern crate quick_error;
extern crate simple_logger;

use std::io::{self, Write};
use std::process;

mod cli;
mod tools;
mod utils;


quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Gpd(err: gpd::Error) {
            display("{}", err)
            from()
            cause(err)
        }
        Io(err: io::Error) {
            display("{}", err)
            from()
            cause(err)
        }
        Args(msg: String) {
            display("{}", msg)
        }
        Logger(err: log::SetLoggerError) {
            display("could not set up logging: {}", err)
            from()
            cause(err)
        }
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;


fn main() {
    let matches = cli::build_cli().get_matches();
    if let Err(err) = cli::run(matches) {
        let _ = writeln!(io::stderr(), "error: {}", err);
        process::exit(1);
    }
    process::exit(0);
}
