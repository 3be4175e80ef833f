pub mod csv_match_sink;
pub mod csv_table_source;
pub mod google_translate;

pub use csv_match_sink::CsvMatchSink;
pub use csv_table_source::CsvTableSource;
pub use google_translate::GoogleTranslateClient;
