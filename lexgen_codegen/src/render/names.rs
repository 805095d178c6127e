//! Identifier formatting for generated code.
//!
//! One `NameFormatter` instance per render is the single source of truth
//! for every identifier that appears in more than one output unit: the
//! first assignment for a key wins, and later lookups for the same key
//! return the identical spelling. Candidates that collide with an already
//! assigned identifier or a backend keyword get a numeric suffix.

use crate::config::constants::compile_time::render::MAX_IDENTIFIER_LENGTH;
use std::collections::{HashMap, HashSet};

#[derive(Debug)]
pub struct NameFormatter {
    reserved: HashSet<String>,
    cache: HashMap<String, String>,
    used: HashSet<String>,
}

impl NameFormatter {
    pub fn new(reserved_keywords: &[&str]) -> Self {
        Self {
            reserved: reserved_keywords
                .iter()
                .map(|kw| kw.to_lowercase())
                .collect(),
            cache: HashMap::new(),
            used: HashSet::new(),
        }
    }

    /// Whether a raw identifier is a backend keyword.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(&name.to_lowercase())
    }

    /// Assign an identifier for `key`, starting from `candidate`. The
    /// first call decides; repeated calls with the same key return the
    /// same identifier regardless of candidate.
    pub fn assign(&mut self, key: &str, candidate: &str) -> String {
        if let Some(existing) = self.cache.get(key) {
            return existing.clone();
        }

        let base: String = candidate.chars().take(MAX_IDENTIFIER_LENGTH).collect();
        let mut id = base.clone();
        let mut n = 1;
        while self.used.contains(&id) || self.reserved.contains(&id.to_lowercase()) {
            id = format!("{}{}", base, n);
            n += 1;
        }

        self.used.insert(id.clone());
        self.cache.insert(key.to_string(), id.clone());
        id
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.cache.get(key).map(String::as_str)
    }
}

/// Derived include-guard identifier for header-like units.
pub fn header_guard(namespace: &str, base_file_name: &str) -> String {
    format!(
        "{}_{}_H",
        namespace.replace(':', ""),
        base_file_name.to_uppercase()
    )
}
