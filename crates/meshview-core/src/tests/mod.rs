mod config;
mod parse;
