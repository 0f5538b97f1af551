//! The CSS object model: tokens, blocks, functions, declarations and rules, stored in
//! ordered lists that know how to serialize themselves.

use crate::token::{Token, TokenType};
use crate::util::{stringify, StringifyOptions};
use sanecss_shared::errors::{CssError, CssResult};
use sanecss_shared::location::Location;

mod component_value;
mod declaration;
mod list;
mod rule;
mod stylesheet;

pub use component_value::{ComponentValue, CssFunction, SimpleBlock};
pub use declaration::Declaration;
pub use list::{CssObjectList, ListId, ListItem};
pub use rule::{AtRule, DeclarationOrAtRule, QualifiedRule, Rule};
pub use stylesheet::Stylesheet;

/// Something that can be turned back into tokens
pub trait CssObject {
    /// Position of the object in the source, if known
    fn position(&self) -> Option<Location>;

    /// Tokens making up this object, including the tokens that delimit blocks and functions
    fn to_token_array(&self) -> Vec<Token>;

    /// Component values making up this object. Blocks and functions are kept whole.
    fn to_component_value_array(&self) -> Vec<ComponentValue>;

    /// Serializes the object, see [`stringify`]
    fn to_css_string(&self, options: StringifyOptions) -> String {
        stringify(&self.to_token_array(), options)
    }
}

pub type ComponentValueList = CssObjectList<ComponentValue>;
pub type TokenList = CssObjectList<Token>;
pub type RuleList = CssObjectList<Rule>;
pub type DeclarationList = CssObjectList<Declaration>;
pub type DeclarationOrAtRuleList = CssObjectList<DeclarationOrAtRule>;

impl CssObject for Token {
    fn position(&self) -> Option<Location> {
        self.location
    }

    fn to_token_array(&self) -> Vec<Token> {
        vec![self.clone()]
    }

    fn to_component_value_array(&self) -> Vec<ComponentValue> {
        vec![ComponentValue::Token(self.clone())]
    }
}

impl ListItem for Token {}

/// An insignificant whitespace token, used where serialization needs a separator that
/// minification may drop
pub(crate) fn insignificant_whitespace() -> Token {
    Token::whitespace().copy_with_significance(false)
}

/// Checks that the preprocessor comments only contain preprocessor comment tokens
pub(crate) fn check_pp_comments(comments: &[Token]) -> CssResult<()> {
    match comments
        .iter()
        .find(|t| !matches!(t.token_type, TokenType::PreprocessorComment(_)))
    {
        Some(t) => Err(CssError::invalid_argument(format!(
            "Preprocessor comments must be preprocessor-comment tokens, got {}",
            t.type_name()
        ))),
        None => Ok(()),
    }
}

/// Tokens for preprocessor comments preceding a rule or declaration
pub(crate) fn pp_comment_tokens(comments: &[Token]) -> Vec<Token> {
    comments
        .iter()
        .flat_map(|t| [t.clone(), insignificant_whitespace()])
        .collect()
}

/// Returns the earliest of two optional locations
pub(crate) fn earliest(a: Option<Location>, b: Option<Location>) -> Option<Location> {
    match (a, b) {
        (Some(a), Some(b)) if b.is_before(&a) => Some(b),
        (Some(a), _) => Some(a),
        (None, b) => b,
    }
}
