use crate::objects::{
    check_pp_comments, insignificant_whitespace, pp_comment_tokens, ComponentValue,
    ComponentValueList, CssObject, ListItem,
};
use crate::token::{Token, TokenType};
use crate::util::{stringify, StringifyOptions};
use sanecss_shared::errors::{CssError, CssResult};
use sanecss_shared::location::Location;
use std::fmt;

/// A `name: value !important` declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub(crate) name: String,
    pub(crate) location: Option<Location>,
    pub(crate) value: ComponentValueList,
    pub(crate) important: bool,
    pub(crate) pp_comments: Vec<Token>,
}

impl Declaration {
    /// Creates a declaration with an empty value from its name token
    pub fn new(token: &Token) -> CssResult<Self> {
        match &token.token_type {
            TokenType::Ident(name) => Ok(Self {
                name: name.clone(),
                location: token.position(),
                value: ComponentValueList::new(),
                important: false,
                pp_comments: Vec::new(),
            }),
            _ => Err(CssError::invalid_argument(format!(
                "Declaration must begin with an ident token, got {}",
                token.type_name()
            ))),
        }
    }

    /// Creates an unpositioned declaration with an empty value
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            location: None,
            value: ComponentValueList::new(),
            important: false,
            pp_comments: Vec::new(),
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

    pub fn important(&self) -> bool {
        self.important
    }

    pub fn set_important(&mut self, important: bool) {
        self.important = important;
    }

    pub fn pp_comments(&self) -> &[Token] {
        &self.pp_comments
    }

    pub fn set_pp_comments(&mut self, comments: Vec<Token>) -> CssResult<()> {
        check_pp_comments(&comments)?;
        self.pp_comments = comments;
        Ok(())
    }

    fn name_token(&self) -> Token {
        Token::ident(&self.name).at(self.location)
    }

    /// Tokens after the value: `!important`, with whitespace in front when the value does
    /// not already end with some
    fn important_tokens(&self) -> Vec<Token> {
        let mut tokens = Vec::new();
        if self.important {
            if !self.value.last().is_some_and(|v| v.is_whitespace()) {
                tokens.push(insignificant_whitespace());
            }
            tokens.push(Token::from_type(TokenType::Delim('!')));
            tokens.push(Token::ident("important"));
        }
        tokens
    }
}

impl CssObject for Declaration {
    fn position(&self) -> Option<Location> {
        self.location
    }

    fn to_token_array(&self) -> Vec<Token> {
        let mut tokens = pp_comment_tokens(&self.pp_comments);
        tokens.push(self.name_token());
        tokens.push(Token::from_type(TokenType::Colon));
        tokens.extend(self.value.to_token_array());
        tokens.extend(self.important_tokens());
        tokens
    }

    fn to_component_value_array(&self) -> Vec<ComponentValue> {
        let mut values: Vec<ComponentValue> = pp_comment_tokens(&self.pp_comments)
            .into_iter()
            .map(ComponentValue::Token)
            .collect();
        values.push(ComponentValue::Token(self.name_token()));
        values.push(ComponentValue::Token(Token::from_type(TokenType::Colon)));
        values.extend(self.value.to_component_value_array());
        values.extend(self.important_tokens().into_iter().map(ComponentValue::Token));
        values
    }
}

impl ListItem for Declaration {
    /// `;` between declarations, and an insignificant one after the last
    fn separator(_left: &Self, right: Option<&Self>) -> Vec<Token> {
        let semicolon = Token::from_type(TokenType::Semicolon);
        match right {
            Some(_) => vec![semicolon, insignificant_whitespace()],
            None => vec![semicolon.copy_with_significance(false)],
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", stringify(&self.to_token_array(), StringifyOptions::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{CssFunction, DeclarationList};

    #[test]
    fn errors() {
        let err = Declaration::new(&Token::at_keyword("value")).unwrap_err();
        assert_eq!(err.message(), "Declaration must begin with an ident token, got at-keyword");

        let mut declaration = Declaration::from_name("a");
        assert!(declaration.set_pp_comments(vec![Token::whitespace()]).is_err());
    }

    #[test]
    fn basics() {
        let ident = Token::new(TokenType::Ident("foobar".into()), Location::new(123, 42, 0));
        let ws = Token::whitespace();
        let iws = ws.copy_with_significance(false);
        let colon = Token::from_type(TokenType::Colon);
        let bang = Token::from_type(TokenType::Delim('!'));
        let important = Token::ident("important");
        let func_token = Token::function("foo");
        let rp = Token::from_type(TokenType::RParen);
        let func = CssFunction::new(&func_token).unwrap();

        let mut declaration = Declaration::new(&ident).unwrap();
        assert_eq!(declaration.position(), Some(Location::new(123, 42, 0)));
        assert_eq!(declaration.name(), "foobar");
        assert!(!declaration.important());
        assert!(declaration.value().is_empty());

        declaration
            .value_mut()
            .add_all(vec![func.clone().into(), ws.clone().into()], None)
            .unwrap();
        assert_eq!(
            declaration.to_token_array(),
            vec![ident.clone(), colon.clone(), func_token.clone(), rp.clone(), ws.clone()]
        );
        assert_eq!(
            declaration.to_component_value_array(),
            vec![
                ident.clone().into(),
                colon.clone().into(),
                func.clone().into(),
                ws.clone().into(),
            ]
        );
        assert_eq!(declaration.to_string(), "foobar:foo() ");

        declaration.set_important(true);
        assert_eq!(
            declaration.to_token_array(),
            vec![
                ident.clone(),
                colon.clone(),
                func_token.clone(),
                rp.clone(),
                ws.clone(),
                bang.clone(),
                important.clone(),
            ]
        );

        let last = declaration.value().len() - 1;
        declaration.value_mut().remove(last).unwrap();
        assert_eq!(
            declaration.to_token_array(),
            vec![ident.clone(), colon.clone(), func_token, rp, iws, bang, important]
        );
        assert_eq!(declaration.to_string(), "foobar:foo() !important");
        assert_eq!(
            declaration.to_css_string(StringifyOptions { minify: true }),
            "foobar:foo()!important"
        );
    }

    #[test]
    fn preprocessor_comments_come_first() {
        let mut declaration = Declaration::from_name("a");
        declaration
            .set_pp_comments(vec![Token::from_type(TokenType::PreprocessorComment("@pp".into()))])
            .unwrap();
        declaration.value_mut().add(Token::ident("b").into(), None).unwrap();

        assert_eq!(declaration.to_string(), "/*@pp*/ a:b");
        assert_eq!(declaration.to_css_string(StringifyOptions { minify: true }), "/*@pp*/a:b");
    }

    #[test]
    fn list_separators() {
        let ws = Token::whitespace();
        let iws = ws.copy_with_significance(false);
        let colon = Token::from_type(TokenType::Colon);
        let semicolon = Token::from_type(TokenType::Semicolon);

        let mut a = Declaration::from_name("a");
        a.value_mut().add(ws.clone().into(), None).unwrap();
        let list = DeclarationList::from_items(vec![a, Declaration::from_name("b")]).unwrap();

        assert_eq!(
            list.to_token_array(),
            vec![
                Token::ident("a"),
                colon.clone(),
                ws,
                semicolon.clone(),
                iws,
                Token::ident("b"),
                colon,
                semicolon.copy_with_significance(false),
            ]
        );
        assert_eq!(list.to_string(), "a: ; b:;");
        assert_eq!(list.to_css_string(StringifyOptions { minify: true }), "a: ;b:");
    }
}
