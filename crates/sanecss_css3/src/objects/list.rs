use crate::objects::{earliest, ComponentValue, CssObject};
use crate::token::Token;
use crate::util::{stringify, StringifyOptions};
use sanecss_shared::errors::{CssError, CssResult};
use sanecss_shared::location::Location;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies a list instance. Every list gets a fresh id when created or cloned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListId(u64);

impl ListId {
    fn next() -> Self {
        ListId(NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// An object that can be stored in a [`CssObjectList`]
pub trait ListItem: CssObject + Clone + fmt::Debug + PartialEq {
    /// Tokens to emit after `left` when serializing. `right` is the next item, if any.
    fn separator(_left: &Self, _right: Option<&Self>) -> Vec<Token> {
        Vec::new()
    }

    /// Verifies that the item may be stored in its list
    fn check(&self) -> CssResult<()> {
        Ok(())
    }
}

/// An ordered list of CSS objects with a cursor.
///
/// Inserting at or before the cursor keeps the current item current, and removing the item
/// at the cursor moves the cursor back one. Removing `key()` while walking the list with
/// `next()` thus visits every item.
pub struct CssObjectList<T: ListItem> {
    id: ListId,
    items: Vec<T>,
    cursor: isize,
}

impl<T: ListItem> Default for CssObjectList<T> {
    fn default() -> Self {
        Self {
            id: ListId::next(),
            items: Vec::new(),
            cursor: 0,
        }
    }
}

impl<T: ListItem> Clone for CssObjectList<T> {
    fn clone(&self) -> Self {
        Self {
            id: ListId::next(),
            items: self.items.clone(),
            cursor: self.cursor,
        }
    }
}

impl<T: ListItem> PartialEq for CssObjectList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: ListItem> fmt::Debug for CssObjectList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T: ListItem> CssObjectList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list holding the given items
    pub fn from_items(items: Vec<T>) -> CssResult<Self> {
        for item in &items {
            item.check()?;
        }

        Ok(Self {
            id: ListId::next(),
            items,
            cursor: 0,
        })
    }

    /// Creates a list from items the caller already knows to be valid for this list
    pub(crate) fn from_vec(items: Vec<T>) -> Self {
        Self {
            id: ListId::next(),
            items,
            cursor: 0,
        }
    }

    pub fn id(&self) -> ListId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Items are not checked again after changes made through this
    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Appends an item the caller already knows to be valid for this list
    pub(crate) fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Removes the last item. The cursor is left alone.
    pub(crate) fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Inserts an item at `index`, or appends it when no index is given
    pub fn add(&mut self, item: T, index: Option<usize>) -> CssResult<()> {
        self.add_all(vec![item], index)
    }

    /// Inserts items at `index`, or appends them when no index is given
    pub fn add_all(&mut self, items: Vec<T>, index: Option<usize>) -> CssResult<()> {
        for item in &items {
            item.check()?;
        }

        let index = index.unwrap_or(self.items.len());
        if index > self.items.len() {
            return Err(CssError::out_of_bounds("Index is out of range."));
        }

        if (index as isize) < self.cursor {
            self.cursor += items.len() as isize;
        }
        self.items.splice(index..index, items);

        Ok(())
    }

    /// Removes and returns the item at `index`
    pub fn remove(&mut self, index: usize) -> CssResult<T> {
        if index >= self.items.len() {
            return Err(CssError::out_of_bounds("Index is out of range."));
        }

        if (index as isize) <= self.cursor {
            self.cursor -= 1;
        }

        Ok(self.items.remove(index))
    }

    /// Replaces the item at `index`. Setting the index one past the end appends.
    pub fn set(&mut self, index: usize, item: T) -> CssResult<()> {
        item.check()?;

        match index.cmp(&self.items.len()) {
            std::cmp::Ordering::Less => {
                self.items[index] = item;
                Ok(())
            }
            std::cmp::Ordering::Equal => {
                self.items.push(item);
                Ok(())
            }
            std::cmp::Ordering::Greater => Err(CssError::out_of_bounds("Offset is out of range.")),
        }
    }

    /// Removes the item at `index`, which must be the last one. Indexes past the end are
    /// ignored.
    pub fn truncate_last(&mut self, index: usize) -> CssResult<()> {
        if index >= self.items.len() {
            return Ok(());
        }
        if index + 1 != self.items.len() {
            return Err(CssError::out_of_bounds("Cannot leave holes in the list."));
        }
        self.remove(index).map(|_| ())
    }

    /// Returns `length` items starting at `offset`. A negative offset counts from the end,
    /// a negative length leaves that many items off the end, and no length takes everything.
    pub fn slice(&self, offset: isize, length: Option<isize>) -> &[T] {
        let len = self.items.len() as isize;
        let start = if offset < 0 { (len + offset).max(0) } else { offset.min(len) };
        let end = match length {
            None => len,
            Some(l) if l < 0 => (len + l).max(start),
            Some(l) => start.saturating_add(l).min(len),
        };

        &self.items[start as usize..end as usize]
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.cursor = 0;
    }

    /// Moves the cursor to the first item
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Moves the cursor to the next item
    pub fn next(&mut self) {
        self.cursor += 1;
    }

    /// Index of the current item, when the cursor is on one
    pub fn key(&self) -> Option<usize> {
        self.valid().then_some(self.cursor as usize)
    }

    pub fn current(&self) -> Option<&T> {
        self.key().and_then(|k| self.items.get(k))
    }

    pub fn valid(&self) -> bool {
        self.cursor >= 0 && (self.cursor as usize) < self.items.len()
    }

    /// Moves the cursor to `index`
    pub fn seek(&mut self, index: usize) -> CssResult<()> {
        if index >= self.items.len() {
            return Err(CssError::out_of_bounds("Offset is out of range."));
        }
        self.cursor = index as isize;
        Ok(())
    }

    /// Consumes the list, returning its items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T: ListItem> CssObject for CssObjectList<T> {
    /// The earliest position of any item. Items are not necessarily in source order.
    fn position(&self) -> Option<Location> {
        self.items
            .iter()
            .fold(None, |acc, item| earliest(acc, item.position()))
    }

    fn to_token_array(&self) -> Vec<Token> {
        let mut tokens = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            tokens.extend(item.to_token_array());
            tokens.extend(T::separator(item, self.items.get(i + 1)));
        }
        tokens
    }

    fn to_component_value_array(&self) -> Vec<ComponentValue> {
        let mut values = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            values.extend(item.to_component_value_array());
            values.extend(
                T::separator(item, self.items.get(i + 1))
                    .into_iter()
                    .map(ComponentValue::Token),
            );
        }
        values
    }
}

impl<T: ListItem> fmt::Display for CssObjectList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            stringify(&self.to_token_array(), StringifyOptions::default())
        )
    }
}

impl<'a, T: ListItem> IntoIterator for &'a CssObjectList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
