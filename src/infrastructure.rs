//! Infrastructure layer: parsing, page fetching, configuration, logging and
//! tabular I/O.

pub mod config; // Configuration, defaults and loading
pub mod logging; // Logging infrastructure
pub mod page_provider; // Page-content provider trait + HTTP implementation
pub mod parsing; // Listing location and price extraction
pub mod parsing_error;
pub mod tabular; // CSV input rows and output records

pub use self::config::{AppConfig, ConfigError, ConfigManager};
pub use logging::{get_log_directory, init_logging_with_config};
pub use page_provider::{FetchError, FetchedPage, HttpPageProvider, PageContentProvider};
pub use parsing::{
    FormatPriceExtractor, ListingLocator, ListingParsers, ParseContext, ParsingConfig, ParsingError,
    PriceBlockParser, ProductSwatchLocator, SearchResultLocator,
};
pub use tabular::{TabularError, read_input_rows, write_output_records};
