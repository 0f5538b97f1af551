use crate::objects::{AtRule, ComponentValueList, QualifiedRule, Rule, RuleList, SimpleBlock, Stylesheet};
use crate::parser::Parser;
use crate::token::TokenType;
use crate::tokenizer::TokenSource;

impl<T: TokenSource> Parser<T> {
    /// Parses a complete stylesheet. CDO and CDC tokens at the top level are ignored.
    ///
    /// See [parse a stylesheet](https://drafts.csswg.org/css-syntax/#parse-stylesheet).
    pub fn parse_stylesheet(&mut self) -> Stylesheet {
        log::trace!("parse_stylesheet");
        Stylesheet::new(self.consume_rule_list(true))
    }

    /// Parses a list of rules, as found in the block of `@media`
    pub fn parse_rule_list(&mut self) -> RuleList {
        log::trace!("parse_rule_list");
        self.consume_rule_list(false)
    }

    /// Parses a single rule, surrounded by optional whitespace. Returns `None` when there is
    /// no valid rule or there is more than one.
    ///
    /// See [parse a rule](https://drafts.csswg.org/css-syntax/#parse-rule).
    pub fn parse_rule(&mut self) -> Option<Rule> {
        log::trace!("parse_rule");

        self.skip_whitespace();
        let rule = match self.consume_token().token_type {
            TokenType::Eof => {
                self.parse_error_here("unexpected-eof");
                return None;
            }
            TokenType::AtKeyword(_) => {
                self.reconsume_current();
                Rule::At(self.consume_at_rule())
            }
            _ => {
                self.reconsume_current();
                Rule::Qualified(self.consume_qualified_rule()?)
            }
        };

        self.skip_whitespace();
        if self.consume_token().is_eof() {
            Some(rule)
        } else {
            self.parse_error_here("expected-eof");
            None
        }
    }

    /// See [consume a list of rules](https://drafts.csswg.org/css-syntax/#consume-list-of-rules).
    fn consume_rule_list(&mut self, top_level: bool) -> RuleList {
        let mut rules = RuleList::new();

        loop {
            match self.consume_token().token_type {
                TokenType::Whitespace => continue,
                TokenType::Eof => break,
                TokenType::Cdo | TokenType::Cdc if top_level => continue,
                TokenType::AtKeyword(_) => {
                    self.reconsume_current();
                    let rule = self.consume_at_rule();
                    rules.push(rule.into());
                }
                _ => {
                    self.reconsume_current();
                    if let Some(rule) = self.consume_qualified_rule() {
                        rules.push(rule.into());
                    }
                }
            }
            self.pp_comments.clear();
        }

        rules
    }

    /// Consumes an at-rule, which ends at a `;`, after its block, or at EOF.
    ///
    /// See [consume an at-rule](https://drafts.csswg.org/css-syntax/#consume-at-rule).
    pub(crate) fn consume_at_rule(&mut self) -> AtRule {
        let keyword = self.consume_token().clone();
        log::trace!("consume_at_rule: {keyword:?}");

        let mut rule = AtRule {
            name: keyword.value().unwrap_or_default().to_string(),
            location: keyword.position(),
            prelude: ComponentValueList::new(),
            block: None,
            pp_comments: self.take_pp_comments(),
        };

        loop {
            match self.consume_token().token_type {
                TokenType::Semicolon => return rule,
                TokenType::Eof => {
                    self.eof_error("unexpected-eof-in-rule");
                    return rule;
                }
                TokenType::LCurly => {
                    rule.block = Some(self.consume_simple_block());
                    return rule;
                }
                _ => {
                    self.reconsume_current();
                    if let Some(value) = self.consume_component_value() {
                        rule.prelude.push(value);
                    }
                }
            }
        }
    }

    /// Consumes a qualified rule. A rule without a block is a parse error and is dropped.
    ///
    /// See [consume a qualified rule](https://drafts.csswg.org/css-syntax/#consume-qualified-rule).
    fn consume_qualified_rule(&mut self) -> Option<QualifiedRule> {
        let location = self.consume_token().position();
        self.reconsume_current();
        log::trace!("consume_qualified_rule at {location:?}");

        let mut rule = QualifiedRule {
            location,
            prelude: ComponentValueList::new(),
            block: SimpleBlock::curly(),
            pp_comments: self.take_pp_comments(),
        };

        loop {
            match self.consume_token().token_type {
                TokenType::Eof => {
                    self.eof_error("unexpected-eof-in-rule");
                    return None;
                }
                TokenType::LCurly => {
                    rule.block = self.consume_simple_block();
                    return Some(rule);
                }
                _ => {
                    self.reconsume_current();
                    if let Some(value) = self.consume_component_value() {
                        rule.prelude.push(value);
                    }
                }
            }
        }
    }
}
