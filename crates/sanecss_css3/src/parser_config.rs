use sanecss_shared::location::Location;

/// Maximum nesting of blocks and functions before the parser gives up on the input
pub const CV_DEPTH_LIMIT: usize = 100;

/// ParserConfig holds the configuration for the parser
#[derive(Clone, Debug)]
pub struct ParserConfig {
    /// Location of the first character of the data source
    pub location: Location,
    /// Optional source filename or url, only used for logging
    pub source: Option<String>,
    /// Keep `/*@...*/` comments and attach them to the rule or declaration that follows
    pub preprocessor_comments: bool,
    /// Maximum nesting depth of component values
    pub recursion_limit: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            location: Location::default(),
            source: None,
            preprocessor_comments: false,
            recursion_limit: CV_DEPTH_LIMIT,
        }
    }
}
