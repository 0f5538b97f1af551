use crate::objects::{
    ComponentValue, ComponentValueList, CssObject, Declaration, DeclarationList,
    DeclarationOrAtRule, DeclarationOrAtRuleList,
};
use crate::parser::Parser;
use crate::token::TokenType;
use crate::tokenizer::TokenSource;

impl<T: TokenSource> Parser<T> {
    /// Parses a single declaration. Everything up to EOF is part of its value.
    ///
    /// See [parse a declaration](https://drafts.csswg.org/css-syntax/#parse-declaration).
    pub fn parse_declaration(&mut self) -> Option<Declaration> {
        log::trace!("parse_declaration");

        self.skip_whitespace();
        if !self.consume_token().is_ident() {
            self.parse_error_here("expected-ident");
            return None;
        }

        self.consume_declaration(false)
    }

    /// Parses the contents of a style attribute or a style rule block. At-rules are not
    /// allowed and are dropped.
    pub fn parse_declaration_list(&mut self) -> DeclarationList {
        log::trace!("parse_declaration_list");

        let declarations = self
            .consume_declaration_list(false)
            .into_iter()
            .filter_map(|entry| match entry {
                DeclarationOrAtRule::Declaration(declaration) => Some(declaration),
                DeclarationOrAtRule::AtRule(_) => None,
            })
            .collect();

        DeclarationList::from_vec(declarations)
    }

    /// Parses a mix of declarations and at-rules, like the block of `@page`.
    ///
    /// See [parse a list of declarations](https://drafts.csswg.org/css-syntax/#parse-list-of-declarations).
    pub fn parse_declaration_or_at_rule_list(&mut self) -> DeclarationOrAtRuleList {
        log::trace!("parse_declaration_or_at_rule_list");
        DeclarationOrAtRuleList::from_vec(self.consume_declaration_list(true))
    }

    /// See [consume a list of declarations](https://drafts.csswg.org/css-syntax/#consume-list-of-declarations).
    fn consume_declaration_list(&mut self, allow_at_rules: bool) -> Vec<DeclarationOrAtRule> {
        let mut entries = Vec::new();

        loop {
            match self.consume_token().token_type {
                TokenType::Whitespace | TokenType::Semicolon => continue,
                TokenType::Eof => break,
                TokenType::AtKeyword(_) => {
                    if !allow_at_rules {
                        self.parse_error_here("unexpected-token-in-declaration-list");
                    }
                    self.reconsume_current();
                    let rule = self.consume_at_rule();
                    if allow_at_rules {
                        entries.push(rule.into());
                    }
                }
                TokenType::Ident(_) => {
                    if let Some(declaration) = self.consume_declaration(true) {
                        entries.push(declaration.into());
                    }
                }
                _ => {
                    self.parse_error_here("unexpected-token-in-declaration-list");
                    self.reconsume_current();
                    self.skip_to_semicolon();
                }
            }
            self.pp_comments.clear();
        }

        entries
    }

    /// Throws away component values up to the next `;` or EOF, which is left to be consumed
    fn skip_to_semicolon(&mut self) {
        loop {
            let token = self.consume_token();
            if token.is_eof() || token.is_semicolon() {
                self.reconsume_current();
                return;
            }
            self.reconsume_current();
            self.consume_component_value();
        }
    }

    /// Consumes a declaration. The current token is the ident with its name. The value ends at
    /// EOF, or at a `;` when `in_list` is set. That token is left to be consumed.
    ///
    /// See [consume a declaration](https://drafts.csswg.org/css-syntax/#consume-declaration).
    fn consume_declaration(&mut self, in_list: bool) -> Option<Declaration> {
        let name = self.current.clone();
        let pp_comments = self.take_pp_comments();
        log::trace!("consume_declaration: {name:?}");

        let mut values = Vec::new();
        loop {
            let token = self.consume_token();
            if token.is_eof() || (in_list && token.is_semicolon()) {
                self.reconsume_current();
                break;
            }
            self.reconsume_current();
            if let Some(value) = self.consume_component_value() {
                values.push(value);
            }
        }
        let end = self.current.position();

        let mut values = values.into_iter().peekable();
        while values.next_if(ComponentValue::is_whitespace).is_some() {}
        match values.next() {
            Some(colon) if colon.is_token_of(&TokenType::Colon) => {}
            other => {
                self.parse_error("expected-colon", other.and_then(|v| v.position()).or(end));
                return None;
            }
        }
        while values.next_if(ComponentValue::is_whitespace).is_some() {}

        let mut value: Vec<ComponentValue> = values.collect();
        let important = strip_important(&mut value);
        while value.last().is_some_and(ComponentValue::is_whitespace) {
            value.pop();
        }

        Some(Declaration {
            name: name.value().unwrap_or_default().to_string(),
            location: name.position(),
            value: ComponentValueList::from_vec(value),
            important,
            pp_comments,
        })
    }
}

/// Index just past the last non-whitespace value before `end`
fn skip_whitespace_back(values: &[ComponentValue], mut end: usize) -> usize {
    while end > 0 && values[end - 1].is_whitespace() {
        end -= 1;
    }
    end
}

/// Removes a trailing `! important` from a declaration value. Returns true when there was one.
fn strip_important(values: &mut Vec<ComponentValue>) -> bool {
    let end = skip_whitespace_back(values, values.len());
    if end == 0 || !values[end - 1].as_token().is_some_and(|t| t.is_ident_named("important")) {
        return false;
    }

    let end = skip_whitespace_back(values, end - 1);
    if end == 0 || !values[end - 1].as_token().is_some_and(|t| t.is_delim('!')) {
        return false;
    }

    values.truncate(end - 1);
    true
}
