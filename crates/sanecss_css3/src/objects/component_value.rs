use crate::objects::{
    insignificant_whitespace, ComponentValueList, CssObject, CssObjectList, ListId, ListItem,
};
use crate::token::{Token, TokenType};
use crate::util::{stringify, StringifyOptions};
use sanecss_shared::errors::{CssError, CssResult};
use sanecss_shared::location::Location;
use std::fmt;

/// A single component value: a preserved token, a simple block or a function
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    Token(Token),
    SimpleBlock(SimpleBlock),
    Function(CssFunction),
}

impl ComponentValue {
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            ComponentValue::Token(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&SimpleBlock> {
        match self {
            ComponentValue::SimpleBlock(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&CssFunction> {
        match self {
            ComponentValue::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, ComponentValue::Token(t) if t.is_whitespace())
    }

    /// Returns true for a token of the same kind as `token_type`, ignoring its payload
    pub fn is_token_of(&self, token_type: &TokenType) -> bool {
        matches!(self, ComponentValue::Token(t) if t.token_type.same_kind(token_type))
    }

    /// Inner list of a block or function
    pub fn inner(&self) -> Option<&ComponentValueList> {
        match self {
            ComponentValue::SimpleBlock(b) => Some(b.value()),
            ComponentValue::Function(f) => Some(f.value()),
            ComponentValue::Token(_) => None,
        }
    }
}

impl From<Token> for ComponentValue {
    fn from(token: Token) -> Self {
        ComponentValue::Token(token)
    }
}

impl From<SimpleBlock> for ComponentValue {
    fn from(block: SimpleBlock) -> Self {
        ComponentValue::SimpleBlock(block)
    }
}

impl From<CssFunction> for ComponentValue {
    fn from(function: CssFunction) -> Self {
        ComponentValue::Function(function)
    }
}

impl CssObject for ComponentValue {
    fn position(&self) -> Option<Location> {
        match self {
            ComponentValue::Token(t) => t.position(),
            ComponentValue::SimpleBlock(b) => b.position(),
            ComponentValue::Function(f) => f.position(),
        }
    }

    fn to_token_array(&self) -> Vec<Token> {
        match self {
            ComponentValue::Token(t) => vec![t.clone()],
            ComponentValue::SimpleBlock(b) => b.to_token_array(),
            ComponentValue::Function(f) => f.to_token_array(),
        }
    }

    fn to_component_value_array(&self) -> Vec<ComponentValue> {
        vec![self.clone()]
    }
}

impl ListItem for ComponentValue {
    /// Tokens that open blocks or functions must be wrapped in their objects
    fn check(&self) -> CssResult<()> {
        match self {
            ComponentValue::Token(t)
                if matches!(
                    t.token_type,
                    TokenType::Function(_)
                        | TokenType::LBracket
                        | TokenType::LParen
                        | TokenType::LCurly
                ) =>
            {
                Err(CssError::invalid_argument(format!(
                    "ComponentValueList may not contain tokens of type \"{}\".",
                    t.type_name()
                )))
            }
            _ => Ok(()),
        }
    }
}

impl CssObjectList<ComponentValue> {
    /// Rewrites the significance of the whitespace tokens among the first `end` values, and
    /// of all whitespace inside the blocks and functions there. `significant` gets the id of
    /// the list holding the whitespace and its index. Nothing else in the list changes.
    pub fn set_whitespace_significance(
        &mut self,
        end: usize,
        significant: &dyn Fn(ListId, usize) -> bool,
    ) {
        let id = self.id();
        for (index, value) in self.iter_mut().take(end).enumerate() {
            match value {
                ComponentValue::Token(token) if token.is_whitespace() => {
                    let wanted = significant(id, index);
                    if token.significant() != wanted {
                        *token = token.copy_with_significance(wanted);
                    }
                }
                ComponentValue::Token(_) => {}
                ComponentValue::SimpleBlock(block) => {
                    let inner = block.value_mut();
                    inner.set_whitespace_significance(inner.len(), significant);
                }
                ComponentValue::Function(function) => {
                    let inner = function.value_mut();
                    inner.set_whitespace_significance(inner.len(), significant);
                }
            }
        }
    }
}

impl fmt::Display for ComponentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_css_string(StringifyOptions::default()))
    }
}

/// A `{}`, `[]` or `()` delimited block
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleBlock {
    pub(crate) start: TokenType,
    pub(crate) location: Option<Location>,
    pub(crate) value: ComponentValueList,
}

impl SimpleBlock {
    /// Creates an empty block from its opening token
    pub fn new(token: &Token) -> CssResult<Self> {
        Self::end_for(&token.token_type)
            .ok_or_else(|| CssError::invalid_argument("A SimpleBlock is delimited by either {}, [], or ()."))?;

        Ok(Self {
            start: token.token_type.clone(),
            location: token.position(),
            value: ComponentValueList::new(),
        })
    }

    /// Creates an empty, unpositioned block from the type of its opening token
    pub fn with_delimiter(start: TokenType) -> CssResult<Self> {
        Self::new(&Token::from_type(start))
    }

    /// An empty, unpositioned `{}` block
    pub fn curly() -> Self {
        Self {
            start: TokenType::LCurly,
            location: None,
            value: ComponentValueList::new(),
        }
    }

    /// Closing token type for an opening token type
    pub fn end_for(start: &TokenType) -> Option<TokenType> {
        match start {
            TokenType::LCurly => Some(TokenType::RCurly),
            TokenType::LBracket => Some(TokenType::RBracket),
            TokenType::LParen => Some(TokenType::RParen),
            _ => None,
        }
    }

    pub fn start_token_type(&self) -> &TokenType {
        &self.start
    }

    pub fn end_token_type(&self) -> TokenType {
        Self::end_for(&self.start).unwrap_or(TokenType::RCurly)
    }

    pub fn value(&self) -> &ComponentValueList {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut ComponentValueList {
        &mut self.value
    }

    pub fn is_curly(&self) -> bool {
        self.start == TokenType::LCurly
    }
}

impl CssObject for SimpleBlock {
    fn position(&self) -> Option<Location> {
        self.location
    }

    /// In `{}` blocks, insignificant whitespace pads non-empty content so it reads nicely
    fn to_token_array(&self) -> Vec<Token> {
        let mut tokens = vec![Token::from_type(self.start.clone()).at(self.location)];
        let inner = self.value.to_token_array();

        let pad = self.is_curly() && !inner.is_empty();
        if pad && !inner.first().is_some_and(|t| t.is_whitespace()) {
            tokens.push(insignificant_whitespace());
        }
        let ends_with_ws = inner.last().is_some_and(|t| t.is_whitespace());
        tokens.extend(inner);
        if pad && !ends_with_ws {
            tokens.push(insignificant_whitespace());
        }

        tokens.push(Token::from_type(self.end_token_type()));
        tokens
    }

    fn to_component_value_array(&self) -> Vec<ComponentValue> {
        vec![ComponentValue::SimpleBlock(self.clone())]
    }
}

impl fmt::Display for SimpleBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", stringify(&self.to_token_array(), StringifyOptions::default()))
    }
}

/// A function call: a function token, its arguments and the closing parenthesis
#[derive(Debug, Clone, PartialEq)]
pub struct CssFunction {
    pub(crate) name: String,
    pub(crate) location: Option<Location>,
    pub(crate) value: ComponentValueList,
}

impl CssFunction {
    /// Creates a function without arguments from its function token
    pub fn new(token: &Token) -> CssResult<Self> {
        match &token.token_type {
            TokenType::Function(name) => Ok(Self {
                name: name.clone(),
                location: token.position(),
                value: ComponentValueList::new(),
            }),
            _ => Err(CssError::invalid_argument(format!(
                "CSS function must begin with a function token, got {}",
                token.type_name()
            ))),
        }
    }

    /// Creates an unpositioned function without arguments
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            location: None,
            value: ComponentValueList::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &ComponentValueList {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut ComponentValueList {
        &mut self.value
    }
}

impl CssObject for CssFunction {
    fn position(&self) -> Option<Location> {
        self.location
    }

    fn to_token_array(&self) -> Vec<Token> {
        let mut tokens = vec![Token::function(&self.name).at(self.location)];
        tokens.extend(self.value.to_token_array());
        tokens.push(Token::from_type(TokenType::RParen));
        tokens
    }

    fn to_component_value_array(&self) -> Vec<ComponentValue> {
        vec![ComponentValue::Function(self.clone())]
    }
}

impl fmt::Display for CssFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", stringify(&self.to_token_array(), StringifyOptions::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(token_type: TokenType) -> Token {
        Token::from_type(token_type)
    }

    #[test]
    fn block_errors() {
        let err = SimpleBlock::new(&Token::ident("value")).unwrap_err();
        assert_eq!(err.message(), "A SimpleBlock is delimited by either {}, [], or ().");
    }

    #[test]
    fn block_basics() {
        for (start, end) in [
            (TokenType::LCurly, TokenType::RCurly),
            (TokenType::LBracket, TokenType::RBracket),
            (TokenType::LParen, TokenType::RParen),
        ] {
            let block = SimpleBlock::new(&t(start.clone())).unwrap();
            assert_eq!(block.start_token_type(), &start);
            assert_eq!(block.end_token_type(), end);
            assert!(block.value().is_empty());
            assert_eq!(block.to_token_array(), vec![t(start.clone()), t(end.clone())]);
            assert_eq!(
                block.to_component_value_array(),
                vec![ComponentValue::SimpleBlock(block.clone())]
            );
        }
    }

    #[test]
    fn braces_insert_insignificant_whitespace() {
        let colon = t(TokenType::Colon);
        let ws = Token::whitespace();
        let iws = ws.copy_with_significance(false);

        let mut block = SimpleBlock::with_delimiter(TokenType::LCurly).unwrap();
        block.value_mut().add(colon.clone().into(), None).unwrap();
        assert_eq!(
            block.to_token_array(),
            vec![t(TokenType::LCurly), iws.clone(), colon.clone(), iws, t(TokenType::RCurly)]
        );
        assert_eq!(block.to_string(), "{ : }");

        block.value_mut().add(ws.clone().into(), Some(0)).unwrap();
        block.value_mut().add(ws.clone().into(), None).unwrap();
        assert_eq!(
            block.to_token_array(),
            vec![t(TokenType::LCurly), ws.clone(), colon.clone(), ws, t(TokenType::RCurly)]
        );

        let mut block = SimpleBlock::with_delimiter(TokenType::LBracket).unwrap();
        block.value_mut().add(colon.clone().into(), None).unwrap();
        assert_eq!(
            block.to_token_array(),
            vec![t(TokenType::LBracket), colon, t(TokenType::RBracket)]
        );
        assert_eq!(block.to_string(), "[:]");
    }

    #[test]
    fn block_clone_is_deep() {
        let mut block = SimpleBlock::with_delimiter(TokenType::LCurly).unwrap();
        block.value_mut().add(Token::whitespace().into(), None).unwrap();

        let block2 = block.clone();
        assert_ne!(block.value().id(), block2.value().id());
        assert_eq!(block, block2);
    }

    #[test]
    fn functions() {
        let err = CssFunction::new(&Token::ident("value")).unwrap_err();
        assert_eq!(err.message(), "CSS function must begin with a function token, got ident");

        let location = Location::new(123, 42, 0);
        let token = Token::new(TokenType::Function("foo".into()), location);
        let ws = Token::whitespace();
        let rp = t(TokenType::RParen);

        let mut func = CssFunction::new(&token).unwrap();
        assert_eq!(func.position(), Some(location));
        assert_eq!(func.name(), "foo");
        assert_eq!(func.to_token_array(), vec![token.clone(), rp.clone()]);

        func.value_mut().add(ws.clone().into(), None).unwrap();
        assert_eq!(func.to_token_array(), vec![token.clone(), ws, rp]);
        assert_eq!(func.to_string(), "foo( )");

        assert_eq!(CssFunction::from_name("bar").to_string(), "bar()");
    }

    #[test]
    fn list_rejects_opening_tokens() {
        let mut list = ComponentValueList::new();
        for (token_type, name) in [
            (TokenType::Function("f".into()), "function"),
            (TokenType::LBracket, "["),
            (TokenType::LParen, "("),
            (TokenType::LCurly, "{"),
        ] {
            let err = list.add(t(token_type).into(), None).unwrap_err();
            assert_eq!(
                err.message(),
                format!("ComponentValueList may not contain tokens of type \"{name}\".")
            );
        }

        list.add(t(TokenType::RCurly).into(), None).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn whitespace_significance() {
        let mut block = SimpleBlock::with_delimiter(TokenType::LParen).unwrap();
        block
            .value_mut()
            .add_all(vec![Token::whitespace().into(), Token::ident("b").into()], None)
            .unwrap();
        let inner = block.value().id();
        let mut list = ComponentValueList::from_items(vec![
            Token::whitespace().into(),
            Token::ident("a").into(),
            block.into(),
            Token::whitespace().into(),
        ])
        .unwrap();
        let outer = list.id();

        list.set_whitespace_significance(3, &|id, index| id == outer && index == 0);
        let flags: Vec<_> = list
            .iter()
            .filter_map(ComponentValue::as_token)
            .map(Token::significant)
            .collect();
        // The trailing whitespace lies past the end and keeps its significance
        assert_eq!(flags, vec![true, true, true]);
        let nested = list.get(2).and_then(ComponentValue::inner).unwrap();
        assert!(!nested.get(0).and_then(ComponentValue::as_token).unwrap().significant());

        list.set_whitespace_significance(list.len(), &|id, index| id == inner && index == 0);
        let flags: Vec<_> = list
            .iter()
            .filter_map(ComponentValue::as_token)
            .map(Token::significant)
            .collect();
        assert_eq!(flags, vec![false, true, false]);
        let nested = list.get(2).and_then(ComponentValue::inner).unwrap();
        assert!(nested.get(0).and_then(ComponentValue::as_token).unwrap().significant());
        assert_eq!(nested.get(1), Some(&Token::ident("b").into()));
    }
}
