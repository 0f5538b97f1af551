use sanecss_css3::objects::{ComponentValue, ComponentValueList, CssObject, ListId};
use sanecss_css3::util::{stringify, StringifyOptions};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Capture name for whitespace that a grammar depends on
pub const SIGNIFICANT_WHITESPACE: &str = "significantWhitespace";

/// A successful match of a [`Matcher`](crate::Matcher) against part of a component value list.
///
/// A match does not borrow the list it points into. It records the [`ListId`] of that list
/// and the range it covers, and is resolved against the root list with [`Match::values`].
/// Matches for values that exist nowhere in the tree, like the bounds of a unicode-range,
/// carry those values themselves.
#[derive(Debug, Clone)]
pub struct Match {
    list: ListId,
    start: usize,
    length: usize,
    name: Option<String>,
    captures: Vec<Match>,
    detached: Option<Vec<ComponentValue>>,
    /// Unicode-ranges inside the match as (list, index of the `u`, length)
    uranges: Vec<(ListId, usize, usize)>,
}

impl PartialEq for Match {
    fn eq(&self, other: &Self) -> bool {
        self.list == other.list
            && self.start == other.start
            && self.length == other.length
            && self.name == other.name
            && self.captures == other.captures
    }
}

impl Eq for Match {}

impl Hash for Match {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.list.hash(state);
        self.start.hash(state);
        self.length.hash(state);
        self.name.hash(state);
        self.captures.hash(state);
    }
}

impl Match {
    pub fn new(list: ListId, start: usize, length: usize) -> Self {
        Match {
            list,
            start,
            length,
            name: None,
            captures: Vec::new(),
            detached: None,
            uranges: Vec::new(),
        }
    }

    /// A named match holding its own values. It sits at `start` of `list` with zero length.
    pub fn detached(list: ListId, start: usize, name: &str, values: Vec<ComponentValue>) -> Self {
        Match {
            list,
            start,
            length: 0,
            name: Some(name.to_string()),
            captures: Vec::new(),
            detached: Some(values),
            uranges: Vec::new(),
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_captures(mut self, captures: Vec<Match>) -> Self {
        self.captures = captures;
        self
    }

    /// Records that the match covers a unicode-range of `length` values starting at `start`
    pub(crate) fn with_urange(mut self, start: usize, length: usize) -> Self {
        self.uranges.push((self.list, start, length));
        self
    }

    /// Takes over the unicode-ranges recorded in `part`
    pub(crate) fn extend_uranges(&mut self, part: &Match) {
        self.uranges.extend_from_slice(&part.uranges);
    }

    /// Tells the `u` token of every unicode-range in the match how many values make up the
    /// range, so serialization keeps them together. `root` is the list that was matched.
    pub fn apply_uranges(&self, root: &ComponentValueList) {
        for &(id, start, length) in &self.uranges {
            let token = find_list(root, id)
                .and_then(|list| list.get(start))
                .and_then(ComponentValue::as_token);
            if let Some(u) = token {
                u.set_urange_hack(length);
            }
        }
    }

    pub(crate) fn with_optional_name(mut self, name: Option<&str>) -> Self {
        self.name = name.map(str::to_string);
        self
    }

    /// Id of the list the match points into
    pub fn list_id(&self) -> ListId {
        self.list
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Index just past the match
    pub fn next(&self) -> usize {
        self.start + self.length
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Named sub-matches, in the order they were matched
    pub fn captures(&self) -> &[Match] {
        &self.captures
    }

    pub fn is_detached(&self) -> bool {
        self.detached.is_some()
    }

    /// Returns true when both matches cover the same range of the same list
    pub fn same_position(&self, other: &Match) -> bool {
        self.list == other.list && self.start == other.start && self.length == other.length
    }

    /// Values covered by the match. `root` is the list that was matched; nested blocks and
    /// functions are searched for the list the match points into.
    pub fn values<'a>(&'a self, root: &'a ComponentValueList) -> Option<&'a [ComponentValue]> {
        if let Some(values) = &self.detached {
            return Some(values);
        }
        find_list(root, self.list)?
            .as_slice()
            .get(self.start..self.next())
    }

    /// Serializes the values covered by the match, or an empty string when the match does
    /// not point into `root`
    pub fn to_css_string(&self, root: &ComponentValueList, options: StringifyOptions) -> String {
        let tokens: Vec<_> = self
            .values(root)
            .unwrap_or_default()
            .iter()
            .flat_map(CssObject::to_token_array)
            .collect();
        stringify(&tokens, options)
    }

    /// Collects the first value of every match named [`SIGNIFICANT_WHITESPACE`] in this match
    /// and its captures
    pub(crate) fn collect_significant_whitespace(&self, found: &mut HashSet<(ListId, usize)>) {
        if self.name() == Some(SIGNIFICANT_WHITESPACE) && !self.is_detached() {
            found.insert((self.list, self.start));
        }
        for capture in &self.captures {
            capture.collect_significant_whitespace(found);
        }
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detached {
            Some(values) => {
                let tokens: Vec<_> = values.iter().flat_map(CssObject::to_token_array).collect();
                write!(f, "{}", stringify(&tokens, StringifyOptions::default()))
            }
            None => write!(f, "[{}..{}]", self.start, self.next()),
        }
    }
}

/// Finds the list with the given id: `root` itself or a block or function nested in it
pub fn find_list(root: &ComponentValueList, id: ListId) -> Option<&ComponentValueList> {
    if root.id() == id {
        return Some(root);
    }
    root.iter()
        .filter_map(ComponentValue::inner)
        .find_map(|inner| find_list(inner, id))
}
