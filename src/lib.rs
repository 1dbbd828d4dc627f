pub mod analyzers;
pub mod config;
pub mod join;
pub mod output;
pub mod parser;
pub mod plot;
pub mod preprocess;
pub mod table;
