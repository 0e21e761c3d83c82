use std::error::Error;
use std::fmt;

use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;

static RESOURCE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/resources");

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.text, self.author)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct QuoteBook {
    pub name: String,
    pub quotes: Vec<Quote>,
}

impl QuoteBook {
    /// The built-in motivational quotes
    pub fn bundled() -> Result<Self, Box<dyn Error>> {
        read_book_from_file("quotes.json")
    }

    /// Pick one quote; called once at startup
    pub fn pick_random(&self) -> Option<&Quote> {
        self.quotes.choose(&mut rand::thread_rng())
    }
}

fn read_book_from_file(file_name: &str) -> Result<QuoteBook, Box<dyn Error>> {
    let file = RESOURCE_DIR
        .get_file(file_name)
        .ok_or_else(|| format!("quote file {file_name} not found"))?;

    let contents = file
        .contents_utf8()
        .ok_or("unable to interpret quote file as a string")?;

    Ok(serde_json::from_str(contents)?)
}
