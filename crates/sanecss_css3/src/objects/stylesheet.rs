use crate::objects::{ComponentValue, CssObject, RuleList};
use crate::token::Token;
use crate::util::{stringify, StringifyOptions};
use sanecss_shared::location::Location;
use std::fmt;

/// A complete stylesheet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stylesheet {
    rules: RuleList,
}

impl Stylesheet {
    pub fn new(rules: RuleList) -> Self {
        Self { rules }
    }

    pub fn rule_list(&self) -> &RuleList {
        &self.rules
    }

    pub fn rule_list_mut(&mut self) -> &mut RuleList {
        &mut self.rules
    }
}

impl CssObject for Stylesheet {
    fn position(&self) -> Option<Location> {
        self.rules.position()
    }

    fn to_token_array(&self) -> Vec<Token> {
        self.rules.to_token_array()
    }

    fn to_component_value_array(&self) -> Vec<ComponentValue> {
        self.rules.to_component_value_array()
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", stringify(&self.to_token_array(), StringifyOptions::default()))
    }
}
