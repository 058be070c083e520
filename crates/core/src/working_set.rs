//! Insertion-ordered collection of posts keyed by id.

use std::collections::HashMap;

use serde::Serialize;

use crate::Post;

/// Posts accumulated for one (source instance, account) run.
///
/// Keeps insertion order; the first post inserted under an id wins.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct WorkingSet {
    posts: Vec<Post>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl WorkingSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `post`; returns `false` and leaves the set unchanged when its id
    /// is already present.
    pub fn insert(&mut self, post: Post) -> bool {
        if self.index.contains_key(&post.id) {
            return false;
        }
        self.index.insert(post.id.clone(), self.posts.len());
        self.posts.push(post);
        true
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Post> {
        self.index.get(id).and_then(|&i| self.posts.get(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Post> {
        self.posts.iter()
    }

    /// New set holding only the posts for which `keep` returns `true`.
    #[must_use]
    pub fn retain_cloned<F: FnMut(&Post) -> bool>(&self, mut keep: F) -> Self {
        self.posts.iter().filter(|p| keep(p)).cloned().collect()
    }
}

impl FromIterator<Post> for WorkingSet {
    fn from_iter<I: IntoIterator<Item = Post>>(iter: I) -> Self {
        let mut set = Self::new();
        for post in iter {
            set.insert(post);
        }
        set
    }
}

impl Extend<Post> for WorkingSet {
    fn extend<I: IntoIterator<Item = Post>>(&mut self, iter: I) {
        for post in iter {
            self.insert(post);
        }
    }
}

impl<'a> IntoIterator for &'a WorkingSet {
    type Item = &'a Post;
    type IntoIter = std::slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.iter()
    }
}

impl IntoIterator for WorkingSet {
    type Item = Post;
    type IntoIter = std::vec::IntoIter<Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.into_iter()
    }
}
