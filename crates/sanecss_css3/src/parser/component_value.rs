use crate::objects::{ComponentValue, ComponentValueList, CssFunction, SimpleBlock};
use crate::parser::Parser;
use crate::token::TokenType;
use crate::tokenizer::TokenSource;

impl<T: TokenSource> Parser<T> {
    /// Parses a single component value, surrounded by optional whitespace.
    ///
    /// See [parse a component value](https://drafts.csswg.org/css-syntax/#parse-component-value).
    pub fn parse_component_value(&mut self) -> Option<ComponentValue> {
        log::trace!("parse_component_value");

        self.skip_whitespace();
        if self.consume_token().is_eof() {
            self.parse_error_here("unexpected-eof");
            return None;
        }
        self.reconsume_current();

        let value = self.consume_component_value()?;

        self.skip_whitespace();
        if self.consume_token().is_eof() {
            Some(value)
        } else {
            self.parse_error_here("expected-eof");
            None
        }
    }

    /// Parses all remaining input as component values, whitespace included
    pub fn parse_component_value_list(&mut self) -> ComponentValueList {
        log::trace!("parse_component_value_list");

        let mut list = ComponentValueList::new();
        while !self.consume_token().is_eof() {
            self.reconsume_current();
            if let Some(value) = self.consume_component_value() {
                list.push(value);
            }
        }
        list
    }

    /// Parses the remaining input as comma-separated lists of component values. The commas
    /// themselves are not part of any list, so `a,,b` results in three lists.
    pub fn parse_comma_separated_component_value_list(&mut self) -> Vec<ComponentValueList> {
        log::trace!("parse_comma_separated_component_value_list");

        let mut lists = Vec::new();
        let mut list = ComponentValueList::new();
        loop {
            let token = self.consume_token();
            if token.is_eof() {
                lists.push(list);
                return lists;
            }
            if token.is_comma() {
                lists.push(std::mem::take(&mut list));
                continue;
            }

            self.reconsume_current();
            if let Some(value) = self.consume_component_value() {
                list.push(value);
            }
        }
    }

    /// Consumes a token, block or function. Returns `None` when the recursion limit is hit,
    /// after which the rest of the input is gone.
    ///
    /// See [consume a component value](https://drafts.csswg.org/css-syntax/#consume-component-value).
    pub(crate) fn consume_component_value(&mut self) -> Option<ComponentValue> {
        let token = self.consume_token().clone();
        if self.depth_exceeded {
            return None;
        }

        self.cv_depth += 1;
        let value = if self.cv_depth > self.config.recursion_limit {
            log::warn!(
                "recursion limit of {} exceeded in {}",
                self.config.recursion_limit,
                self.config.source.as_deref().unwrap_or("<input>")
            );
            self.parse_error("recursion-depth-exceeded", token.position());
            self.depth_exceeded = true;
            self.discard_rest();
            None
        } else {
            match token.token_type {
                TokenType::LCurly | TokenType::LBracket | TokenType::LParen => {
                    Some(self.consume_simple_block().into())
                }
                TokenType::Function(_) => Some(self.consume_function().into()),
                _ => Some(token.into()),
            }
        };
        self.cv_depth -= 1;

        value
    }

    /// Consumes a block. The current token is its opening token.
    ///
    /// See [consume a simple block](https://drafts.csswg.org/css-syntax/#consume-simple-block).
    pub(crate) fn consume_simple_block(&mut self) -> SimpleBlock {
        let start = self.current.clone();
        let end = SimpleBlock::end_for(&start.token_type).unwrap_or(TokenType::RCurly);

        let mut block = SimpleBlock {
            start: start.token_type.clone(),
            location: start.position(),
            value: ComponentValueList::new(),
        };

        loop {
            let token = self.consume_token();
            if token.token_type == end {
                return block;
            }
            if token.is_eof() {
                self.eof_error("unexpected-eof-in-block");
                return block;
            }

            self.reconsume_current();
            if let Some(value) = self.consume_component_value() {
                block.value.push(value);
            }
        }
    }

    /// Consumes a function. The current token is its function token.
    ///
    /// See [consume a function](https://drafts.csswg.org/css-syntax/#consume-function).
    fn consume_function(&mut self) -> CssFunction {
        let start = self.current.clone();
        let mut function = CssFunction {
            name: start.value().unwrap_or_default().to_string(),
            location: start.position(),
            value: ComponentValueList::new(),
        };

        loop {
            let token = self.consume_token();
            if token.token_type == TokenType::RParen {
                return function;
            }
            if token.is_eof() {
                self.eof_error("unexpected-eof-in-function");
                return function;
            }

            self.reconsume_current();
            if let Some(value) = self.consume_component_value() {
                function.value.push(value);
            }
        }
    }
}
