use crate::objects::{
    check_pp_comments, insignificant_whitespace, pp_comment_tokens, ComponentValue,
    ComponentValueList, CssObject, Declaration, ListItem, SimpleBlock,
};
use crate::token::{Token, TokenType};
use crate::util::{stringify, StringifyOptions};
use sanecss_shared::errors::{CssError, CssResult};
use sanecss_shared::location::Location;
use std::fmt;

/// An at-rule: `@name prelude;` or `@name prelude { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    pub(crate) name: String,
    pub(crate) location: Option<Location>,
    pub(crate) prelude: ComponentValueList,
    pub(crate) block: Option<SimpleBlock>,
    pub(crate) pp_comments: Vec<Token>,
}

impl AtRule {
    /// Creates an at-rule without prelude or block from its at-keyword token
    pub fn new(token: &Token) -> CssResult<Self> {
        match &token.token_type {
            TokenType::AtKeyword(name) => Ok(Self {
                name: name.clone(),
                location: token.position(),
                prelude: ComponentValueList::new(),
                block: None,
                pp_comments: Vec::new(),
            }),
            _ => Err(CssError::invalid_argument(format!(
                "At rule must begin with an at-keyword token, got {}",
                token.type_name()
            ))),
        }
    }

    /// Creates an unpositioned at-rule
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            location: None,
            prelude: ComponentValueList::new(),
            block: None,
            pp_comments: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prelude(&self) -> &ComponentValueList {
        &self.prelude
    }

    pub fn prelude_mut(&mut self) -> &mut ComponentValueList {
        &mut self.prelude
    }

    pub fn block(&self) -> Option<&SimpleBlock> {
        self.block.as_ref()
    }

    pub fn block_mut(&mut self) -> Option<&mut SimpleBlock> {
        self.block.as_mut()
    }

    /// Sets or removes the block. A block must be delimited by `{}`.
    pub fn set_block(&mut self, block: Option<SimpleBlock>) -> CssResult<()> {
        if block.as_ref().is_some_and(|b| !b.is_curly()) {
            return Err(CssError::invalid_argument("At-rule block must be delimited by {}"));
        }
        self.block = block;
        Ok(())
    }

    pub fn pp_comments(&self) -> &[Token] {
        &self.pp_comments
    }

    pub fn set_pp_comments(&mut self, comments: Vec<Token>) -> CssResult<()> {
        check_pp_comments(&comments)?;
        self.pp_comments = comments;
        Ok(())
    }

    fn keyword_token(&self) -> Token {
        Token::at_keyword(&self.name).at(self.location)
    }
}

impl CssObject for AtRule {
    fn position(&self) -> Option<Location> {
        self.location
    }

    fn to_token_array(&self) -> Vec<Token> {
        let mut tokens = pp_comment_tokens(&self.pp_comments);
        tokens.push(self.keyword_token());
        tokens.extend(self.prelude.to_token_array());
        match &self.block {
            Some(block) => tokens.extend(block.to_token_array()),
            None => tokens.push(Token::from_type(TokenType::Semicolon)),
        }
        tokens
    }

    fn to_component_value_array(&self) -> Vec<ComponentValue> {
        let mut values: Vec<ComponentValue> = pp_comment_tokens(&self.pp_comments)
            .into_iter()
            .map(ComponentValue::Token)
            .collect();
        values.push(ComponentValue::Token(self.keyword_token()));
        values.extend(self.prelude.to_component_value_array());
        match &self.block {
            Some(block) => values.push(ComponentValue::SimpleBlock(block.clone())),
            None => values.push(ComponentValue::Token(Token::from_type(TokenType::Semicolon))),
        }
        values
    }
}

impl fmt::Display for AtRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", stringify(&self.to_token_array(), StringifyOptions::default()))
    }
}

/// A qualified rule: `prelude { ... }`, usually a style rule
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedRule {
    pub(crate) location: Option<Location>,
    pub(crate) prelude: ComponentValueList,
    pub(crate) block: SimpleBlock,
    pub(crate) pp_comments: Vec<Token>,
}

impl Default for QualifiedRule {
    fn default() -> Self {
        Self::new(None)
    }
}

impl QualifiedRule {
    /// Creates a rule with an empty prelude and an empty `{}` block. The rule is positioned
    /// at the given token, typically the first token of its prelude.
    pub fn new(token: Option<&Token>) -> Self {
        Self {
            location: token.and_then(|t| t.position()),
            prelude: ComponentValueList::new(),
            block: SimpleBlock::curly(),
            pp_comments: Vec::new(),
        }
    }

    pub fn prelude(&self) -> &ComponentValueList {
        &self.prelude
    }

    pub fn prelude_mut(&mut self) -> &mut ComponentValueList {
        &mut self.prelude
    }

    pub fn block(&self) -> &SimpleBlock {
        &self.block
    }

    pub fn block_mut(&mut self) -> &mut SimpleBlock {
        &mut self.block
    }

    /// Replaces the block, which must be delimited by `{}`
    pub fn set_block(&mut self, block: SimpleBlock) -> CssResult<()> {
        if !block.is_curly() {
            return Err(CssError::invalid_argument(
                "Qualified rule block must be delimited by {}",
            ));
        }
        self.block = block;
        Ok(())
    }

    pub fn pp_comments(&self) -> &[Token] {
        &self.pp_comments
    }

    pub fn set_pp_comments(&mut self, comments: Vec<Token>) -> CssResult<()> {
        check_pp_comments(&comments)?;
        self.pp_comments = comments;
        Ok(())
    }
}

impl CssObject for QualifiedRule {
    fn position(&self) -> Option<Location> {
        self.location
    }

    fn to_token_array(&self) -> Vec<Token> {
        let mut tokens = pp_comment_tokens(&self.pp_comments);
        tokens.extend(self.prelude.to_token_array());
        tokens.extend(self.block.to_token_array());
        tokens
    }

    fn to_component_value_array(&self) -> Vec<ComponentValue> {
        let mut values: Vec<ComponentValue> = pp_comment_tokens(&self.pp_comments)
            .into_iter()
            .map(ComponentValue::Token)
            .collect();
        values.extend(self.prelude.to_component_value_array());
        values.push(ComponentValue::SimpleBlock(self.block.clone()));
        values
    }
}

impl fmt::Display for QualifiedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", stringify(&self.to_token_array(), StringifyOptions::default()))
    }
}

/// Any rule that can appear in a rule list
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    At(AtRule),
    Qualified(QualifiedRule),
}

impl From<AtRule> for Rule {
    fn from(rule: AtRule) -> Self {
        Rule::At(rule)
    }
}

impl From<QualifiedRule> for Rule {
    fn from(rule: QualifiedRule) -> Self {
        Rule::Qualified(rule)
    }
}

impl Rule {
    pub fn set_pp_comments(&mut self, comments: Vec<Token>) -> CssResult<()> {
        match self {
            Rule::At(r) => r.set_pp_comments(comments),
            Rule::Qualified(r) => r.set_pp_comments(comments),
        }
    }
}

impl CssObject for Rule {
    fn position(&self) -> Option<Location> {
        match self {
            Rule::At(r) => r.position(),
            Rule::Qualified(r) => r.position(),
        }
    }

    fn to_token_array(&self) -> Vec<Token> {
        match self {
            Rule::At(r) => r.to_token_array(),
            Rule::Qualified(r) => r.to_token_array(),
        }
    }

    fn to_component_value_array(&self) -> Vec<ComponentValue> {
        match self {
            Rule::At(r) => r.to_component_value_array(),
            Rule::Qualified(r) => r.to_component_value_array(),
        }
    }
}

impl ListItem for Rule {
    /// Insignificant whitespace between rules
    fn separator(_left: &Self, right: Option<&Self>) -> Vec<Token> {
        match right {
            Some(_) => vec![insignificant_whitespace()],
            None => Vec::new(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::At(r) => r.fmt(f),
            Rule::Qualified(r) => r.fmt(f),
        }
    }
}

/// An entry of a block that may hold both declarations and at-rules
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationOrAtRule {
    Declaration(Declaration),
    AtRule(AtRule),
}

impl From<Declaration> for DeclarationOrAtRule {
    fn from(declaration: Declaration) -> Self {
        DeclarationOrAtRule::Declaration(declaration)
    }
}

impl From<AtRule> for DeclarationOrAtRule {
    fn from(rule: AtRule) -> Self {
        DeclarationOrAtRule::AtRule(rule)
    }
}

impl CssObject for DeclarationOrAtRule {
    fn position(&self) -> Option<Location> {
        match self {
            DeclarationOrAtRule::Declaration(d) => d.position(),
            DeclarationOrAtRule::AtRule(r) => r.position(),
        }
    }

    fn to_token_array(&self) -> Vec<Token> {
        match self {
            DeclarationOrAtRule::Declaration(d) => d.to_token_array(),
            DeclarationOrAtRule::AtRule(r) => r.to_token_array(),
        }
    }

    fn to_component_value_array(&self) -> Vec<ComponentValue> {
        match self {
            DeclarationOrAtRule::Declaration(d) => d.to_component_value_array(),
            DeclarationOrAtRule::AtRule(r) => r.to_component_value_array(),
        }
    }
}

impl ListItem for DeclarationOrAtRule {
    /// Declarations are followed by `;`, at-rules by whitespace when more entries follow
    fn separator(left: &Self, right: Option<&Self>) -> Vec<Token> {
        let semicolon = Token::from_type(TokenType::Semicolon);
        match (left, right) {
            (DeclarationOrAtRule::Declaration(_), Some(_)) => {
                vec![semicolon, insignificant_whitespace()]
            }
            (DeclarationOrAtRule::Declaration(_), None) => {
                vec![semicolon.copy_with_significance(false)]
            }
            (DeclarationOrAtRule::AtRule(_), Some(_)) => vec![insignificant_whitespace()],
            (DeclarationOrAtRule::AtRule(_), None) => Vec::new(),
        }
    }
}

impl fmt::Display for DeclarationOrAtRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationOrAtRule::Declaration(d) => d.fmt(f),
            DeclarationOrAtRule::AtRule(r) => r.fmt(f),
        }
    }
}
