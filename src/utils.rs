use std::fs;
use std::io::{self, BufReader, Read};
use std::path::Path;

use gpd::GffError;


pub const STREAM_ARG: &str = "-";


pub fn resolve_reader(raw_arg: &str) -> crate::Result<Box<dyn Read>> {
    match raw_arg {
        STREAM_ARG => Ok(Box::new(io::stdin()) as Box<dyn Read>),
        path => match fs::File::open(path) {
            Ok(file) => Ok(Box::new(BufReader::new(file)) as Box<dyn Read>),
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
                let err = gpd::Error::from(GffError::MissingInput(Path::new(path).to_path_buf()));
                Err(crate::Error::from(err))
            },
            Err(e) => Err(crate::Error::from(e)),
        },
    }
}
