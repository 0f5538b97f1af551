use crate::objects::{
    AtRule, ComponentValue, CssFunction, CssObjectList, Declaration, DeclarationOrAtRule,
    ListItem, QualifiedRule, Rule, SimpleBlock, Stylesheet,
};
use crate::token::{Token, TokenType};
use sanecss_shared::location::Location;
use std::io::Write;

/// Anything the walker knows how to print
pub trait Walk {
    fn walk(&self, depth: usize, f: &mut dyn Write) -> std::io::Result<()>;
}

/// The walker is used to walk an object tree and print it, one node per line. Mostly useful
/// for debugging and for comparing parse results in tests.
pub struct Walker<'a> {
    root: &'a dyn Walk,
}

impl<'a> Walker<'a> {
    pub fn new(root: &'a dyn Walk) -> Self {
        Self { root }
    }

    pub fn walk_stdout(&self) {
        let _ = self.root.walk(0, &mut std::io::stdout());
    }

    pub fn walk_to_string(&self) -> String {
        let mut output: Vec<u8> = Vec::new();
        let _ = self.root.walk(0, &mut output);
        String::from_utf8_lossy(&output).into_owned()
    }
}

fn prefix(depth: usize) -> String {
    " ".repeat(depth * 2)
}

fn at(location: Option<Location>) -> String {
    location.map(|l| format!(" {l}")).unwrap_or_default()
}

impl Walk for Token {
    fn walk(&self, depth: usize, f: &mut dyn Write) -> std::io::Result<()> {
        let text = match self.token_type {
            TokenType::Whitespace | TokenType::Eof => String::new(),
            _ => format!(" {}", self.to_css_string(false)),
        };
        let flag = if self.significant() { "" } else { " (insignificant)" };
        writeln!(
            f,
            "{}[{}]{}{}{}",
            prefix(depth),
            self.type_name(),
            text,
            at(self.position()),
            flag
        )
    }
}

impl Walk for SimpleBlock {
    fn walk(&self, depth: usize, f: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            f,
            "{}[Block {}{}]{}",
            prefix(depth),
            self.start_token_type().name(),
            self.end_token_type().name(),
            at(self.location)
        )?;
        self.value().walk(depth + 1, f)
    }
}

impl Walk for CssFunction {
    fn walk(&self, depth: usize, f: &mut dyn Write) -> std::io::Result<()> {
        writeln!(f, "{}[Function] {}{}", prefix(depth), self.name(), at(self.location))?;
        self.value().walk(depth + 1, f)
    }
}

impl Walk for ComponentValue {
    fn walk(&self, depth: usize, f: &mut dyn Write) -> std::io::Result<()> {
        match self {
            ComponentValue::Token(token) => token.walk(depth, f),
            ComponentValue::SimpleBlock(block) => block.walk(depth, f),
            ComponentValue::Function(function) => function.walk(depth, f),
        }
    }
}

fn walk_pp_comments(comments: &[Token], depth: usize, f: &mut dyn Write) -> std::io::Result<()> {
    for comment in comments {
        comment.walk(depth, f)?;
    }
    Ok(())
}

impl Walk for Declaration {
    fn walk(&self, depth: usize, f: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            f,
            "{}[Declaration] property: {} important: {}{}",
            prefix(depth),
            self.name(),
            self.important(),
            at(self.location)
        )?;
        walk_pp_comments(self.pp_comments(), depth + 1, f)?;
        self.value().walk(depth + 1, f)
    }
}

impl Walk for AtRule {
    fn walk(&self, depth: usize, f: &mut dyn Write) -> std::io::Result<()> {
        writeln!(f, "{}[AtRule] name: {}{}", prefix(depth), self.name(), at(self.location))?;
        walk_pp_comments(self.pp_comments(), depth + 1, f)?;
        if !self.prelude().is_empty() {
            writeln!(f, "{}[Prelude]", prefix(depth + 1))?;
            self.prelude().walk(depth + 2, f)?;
        }
        if let Some(block) = self.block() {
            block.walk(depth + 1, f)?;
        }
        Ok(())
    }
}

impl Walk for QualifiedRule {
    fn walk(&self, depth: usize, f: &mut dyn Write) -> std::io::Result<()> {
        writeln!(f, "{}[QualifiedRule]{}", prefix(depth), at(self.location))?;
        walk_pp_comments(self.pp_comments(), depth + 1, f)?;
        if !self.prelude().is_empty() {
            writeln!(f, "{}[Prelude]", prefix(depth + 1))?;
            self.prelude().walk(depth + 2, f)?;
        }
        self.block().walk(depth + 1, f)
    }
}

impl Walk for Rule {
    fn walk(&self, depth: usize, f: &mut dyn Write) -> std::io::Result<()> {
        match self {
            Rule::At(rule) => rule.walk(depth, f),
            Rule::Qualified(rule) => rule.walk(depth, f),
        }
    }
}

impl Walk for DeclarationOrAtRule {
    fn walk(&self, depth: usize, f: &mut dyn Write) -> std::io::Result<()> {
        match self {
            DeclarationOrAtRule::Declaration(declaration) => declaration.walk(depth, f),
            DeclarationOrAtRule::AtRule(rule) => rule.walk(depth, f),
        }
    }
}

impl Walk for Stylesheet {
    fn walk(&self, depth: usize, f: &mut dyn Write) -> std::io::Result<()> {
        writeln!(f, "{}[Stylesheet ({})]", prefix(depth), self.rule_list().len())?;
        self.rule_list().walk(depth + 1, f)
    }
}

/// Prints nothing for `None`, so optional parse results can be compared directly
impl<T: Walk> Walk for Option<T> {
    fn walk(&self, depth: usize, f: &mut dyn Write) -> std::io::Result<()> {
        match self {
            Some(inner) => inner.walk(depth, f),
            None => Ok(()),
        }
    }
}

impl<T: ListItem + Walk> Walk for CssObjectList<T> {
    fn walk(&self, depth: usize, f: &mut dyn Write) -> std::io::Result<()> {
        for item in self.iter() {
            item.walk(depth, f)?;
        }
        Ok(())
    }
}
