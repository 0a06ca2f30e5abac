//! A byte-keyed trie used for maximal-munch matching of operator and
//! punctuation lexemes.
//!
//! Ported directly from the teacher's `field_tree.rs`: insert a set of
//! literal strings each tagged with a value, then look up the longest
//! prefix of an input slice that is a complete entry. The teacher uses
//! this to back its `Punctuations` lexeme utility; Forge's lexer has
//! exactly the same "longest matching fixed string, from a fixed table"
//! problem for tokens like `<`, `<=`, `<<`, `<<=`.

pub struct FieldTree<T> {
    token: Option<T>,
    children: Vec<(u8, FieldTree<T>)>,
}

impl<T> FieldTree<T> {
    pub fn new() -> Self {
        Self {
            token: None,
            children: Vec::new(),
        }
    }

    /// Insert `value` as a complete entry tagged with `token`.
    ///
    /// Returns the previously registered token on a duplicate insert, same
    /// as the teacher's `insert`, so a caller can decide whether that is an
    /// implementation bug.
    pub fn insert(&mut self, value: &[u8], token: T) -> Result<(), T> {
        if !value.is_empty() {
            match self.children.binary_search_by_key(&value[0], |c| c.0) {
                Ok(index) => self.children[index].1.insert(&value[1..], token),
                Err(index) => {
                    let mut field = FieldTree::new();
                    field.insert(&value[1..], token)?;
                    self.children.insert(index, (value[0], field));
                    Ok(())
                }
            }
        } else {
            match self.token.replace(token) {
                Some(previous) => Err(previous),
                None => Ok(()),
            }
        }
    }
}

impl<T: Clone> FieldTree<T> {
    /// Find the longest prefix of `code_part` that is a registered entry.
    ///
    /// Returns the tagged token and the number of bytes consumed.
    pub fn find(&self, code_part: &[u8]) -> Option<(T, usize)> {
        let mut current = self;
        let mut longest: Option<(T, usize)> = None;

        for (index, byte) in code_part.iter().enumerate() {
            if let Some(token) = &current.token {
                longest = Some((token.clone(), index));
            }
            match current.children.binary_search_by_key(byte, |c| c.0) {
                Ok(i) => current = &current.children[i].1,
                Err(_) => return longest,
            }
        }

        if let Some(token) = &current.token {
            longest = Some((token.clone(), code_part.len()));
        }

        longest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_longest_match() {
        let mut tree = FieldTree::new();
        tree.insert(b"<", 1).unwrap();
        tree.insert(b"<=", 2).unwrap();
        tree.insert(b"<<", 3).unwrap();
        tree.insert(b"<<=", 4).unwrap();

        assert_eq!(tree.find(b"<<=x"), Some((4, 3)));
        assert_eq!(tree.find(b"<< x"), Some((3, 2)));
        assert_eq!(tree.find(b"<=x"), Some((2, 2)));
        assert_eq!(tree.find(b"<x"), Some((1, 1)));
        assert_eq!(tree.find(b"x"), None);
    }

    #[test]
    fn rejects_duplicate_entries() {
        let mut tree = FieldTree::new();
        tree.insert(b"+", 1).unwrap();
        assert_eq!(tree.insert(b"+", 2), Err(1));
    }
}
