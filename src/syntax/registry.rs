//! Lexer registry
//!
//! Keeps lexer descriptors in registration order, answers "which lexer for
//! this file", and caches one highlight mode per lexer id.
//!
//! The process-wide instance is created on first use of
//! [`LexerRegistry::global`] from the bundled catalog, unless the host
//! installs its own with [`LexerRegistry::install_global`] beforehand.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use parking_lot::RwLock;

use super::builtin::BuiltinCatalog;
use super::lexer::{LexerCatalog, LexerDescriptor};
use super::mode::HighlightMode;
use super::resolve::StyleMapping;
use crate::error::{Error, Result};

static GLOBAL: OnceLock<LexerRegistry> = OnceLock::new();

/// Outcome of looking up a lexer for a file name
#[derive(Debug, Clone)]
pub enum LexerResolution {
    /// Exactly one lexer claims the file
    Found(Arc<LexerDescriptor>),
    /// Several lexers claim the file, in registration order
    Ambiguous(Vec<Arc<LexerDescriptor>>),
    /// No lexer claims the file
    NotFound,
}

impl LexerResolution {
    /// The deterministic pick: the only or the first candidate
    pub fn into_first(self) -> Option<Arc<LexerDescriptor>> {
        match self {
            LexerResolution::Found(descriptor) => Some(descriptor),
            LexerResolution::Ambiguous(candidates) => candidates.into_iter().next(),
            LexerResolution::NotFound => None,
        }
    }
}

/// Registry of lexers and their highlight modes
pub struct LexerRegistry {
    /// Descriptors in registration order
    lexers: RwLock<Vec<Arc<LexerDescriptor>>>,
    /// Modes built for auto-detected files, keyed by lexer id
    modes: DashMap<String, Arc<HighlightMode>>,
    /// Mapping given to auto-detected modes
    default_mapping: Arc<StyleMapping>,
    /// Mode for files no lexer claims
    plain: Arc<HighlightMode>,
}

impl LexerRegistry {
    /// Create an empty registry using the default style mapping
    pub fn new() -> Self {
        Self::with_mapping(StyleMapping::default_map())
    }

    /// Create an empty registry whose auto-detected modes use `mapping`
    pub fn with_mapping(mapping: StyleMapping) -> Self {
        let default_mapping = Arc::new(mapping);
        Self {
            lexers: RwLock::new(Vec::new()),
            modes: DashMap::new(),
            plain: Arc::new(HighlightMode::new(None, Arc::clone(&default_mapping))),
            default_mapping,
        }
    }

    /// Create a registry holding every lexer of a catalog, in catalog order
    pub fn from_catalog(catalog: &dyn LexerCatalog) -> Result<Self> {
        let registry = Self::new();
        for descriptor in catalog.lexers()? {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// The process-wide registry
    pub fn global() -> &'static LexerRegistry {
        GLOBAL.get_or_init(|| {
            Self::from_catalog(&BuiltinCatalog).unwrap_or_else(|err| {
                tracing::error!(error = %err, "bundled lexer catalog failed to load");
                Self::new()
            })
        })
    }

    /// Install the process-wide registry
    ///
    /// Fails, handing the registry back, if the global one already exists.
    pub fn install_global(registry: LexerRegistry) -> std::result::Result<(), LexerRegistry> {
        GLOBAL.set(registry)
    }

    /// Append a lexer; ids must be unique
    pub fn register(&self, descriptor: LexerDescriptor) -> Result<()> {
        let mut lexers = self.lexers.write();
        if lexers.iter().any(|d| d.id() == descriptor.id()) {
            return Err(Error::DuplicateLexer(descriptor.id().to_string()));
        }
        tracing::debug!(lexer = descriptor.id(), "registered lexer");
        lexers.push(Arc::new(descriptor));
        Ok(())
    }

    /// Look up a lexer by id
    pub fn by_id(&self, id: &str) -> Option<Arc<LexerDescriptor>> {
        self.lexers.read().iter().find(|d| d.id() == id).cloned()
    }

    /// Registered lexer ids, in registration order
    pub fn ids(&self) -> Vec<String> {
        self.lexers.read().iter().map(|d| d.id().to_string()).collect()
    }

    /// Every lexer claiming `filename`
    pub fn select_for(&self, filename: &str) -> LexerResolution {
        let mut candidates: Vec<_> = self
            .lexers
            .read()
            .iter()
            .filter(|d| d.matches(filename))
            .cloned()
            .collect();

        match candidates.len() {
            0 => LexerResolution::NotFound,
            1 => LexerResolution::Found(candidates.remove(0)),
            _ => LexerResolution::Ambiguous(candidates),
        }
    }

    /// The lexer to use for `filename`; ambiguity resolves to the first
    /// registered candidate
    pub fn resolve_for(&self, filename: &str) -> Option<Arc<LexerDescriptor>> {
        let resolution = self.select_for(filename);
        if let LexerResolution::Ambiguous(candidates) = &resolution {
            let ids: Vec<_> = candidates.iter().map(|d| d.id()).collect();
            tracing::debug!(filename, ?ids, "ambiguous lexer, using first candidate");
        }
        resolution.into_first()
    }

    /// Check whether any registered lexer claims `filename`
    pub fn matches_any(&self, filename: &str) -> bool {
        self.lexers.read().iter().any(|d| d.matches(filename))
    }

    /// The cached mode for a lexer, created with the default mapping on
    /// first use
    ///
    /// Concurrent first lookups for the same id all receive the mode stored
    /// by whichever insert landed first.
    pub fn mode_for_lexer(&self, descriptor: &Arc<LexerDescriptor>) -> Arc<HighlightMode> {
        self.modes
            .entry(descriptor.id().to_string())
            .or_insert_with(|| {
                tracing::debug!(lexer = descriptor.id(), "creating highlight mode");
                Arc::new(HighlightMode::new(
                    Some(Arc::clone(descriptor)),
                    Arc::clone(&self.default_mapping),
                ))
            })
            .value()
            .clone()
    }

    /// The cached mode for the lexer claiming `filename`, if any
    pub fn mode_for_file(&self, filename: &str) -> Option<Arc<HighlightMode>> {
        self.resolve_for(filename)
            .map(|descriptor| self.mode_for_lexer(&descriptor))
    }

    /// The lexer-less mode, sharing the default mapping
    pub fn plain_mode(&self) -> Arc<HighlightMode> {
        Arc::clone(&self.plain)
    }

    /// Bind a registered lexer to a style mapping
    pub fn register_mode(&self, lexer_id: &str, mapping: StyleMapping) -> Result<Arc<HighlightMode>> {
        let descriptor = self
            .by_id(lexer_id)
            .ok_or_else(|| Error::UnknownLexer(lexer_id.to_string()))?;
        Ok(Arc::new(HighlightMode::new(Some(descriptor), Arc::new(mapping))))
    }

    /// Number of cached modes
    pub fn cached_modes(&self) -> usize {
        self.modes.len()
    }
}

impl Default for LexerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::lexer::{TokenizerFactory, Tokenizer};
    use crate::syntax::rules::RuleLexer;
    use std::thread;

    fn factory(id: &'static str) -> TokenizerFactory {
        Arc::new(move || -> Result<Box<dyn Tokenizer>> {
            Ok(Box::new(RuleLexer::new(id, &[])?))
        })
    }

    fn descriptor(id: &'static str, patterns: &[&str]) -> LexerDescriptor {
        LexerDescriptor::new(id, patterns, factory(id)).unwrap()
    }

    fn ambiguous_registry() -> LexerRegistry {
        let registry = LexerRegistry::new();
        registry.register(descriptor("x", &["*.h", "*.x"])).unwrap();
        registry.register(descriptor("y", &["*.h", "*.y"])).unwrap();
        registry
    }

    #[test]
    fn test_select_found_and_not_found() {
        let registry = ambiguous_registry();
        match registry.select_for("a.x") {
            LexerResolution::Found(d) => assert_eq!(d.id(), "x"),
            other => panic!("expected Found, got {:?}", other),
        }
        assert!(matches!(registry.select_for("a.z"), LexerResolution::NotFound));
        assert!(registry.resolve_for("a.z").is_none());
    }

    #[test]
    fn test_ambiguity_picks_first_registered() {
        let registry = ambiguous_registry();
        match registry.select_for("defs.h") {
            LexerResolution::Ambiguous(candidates) => {
                let ids: Vec<_> = candidates.iter().map(|d| d.id()).collect();
                assert_eq!(ids, vec!["x", "y"]);
            }
            other => panic!("expected Ambiguous, got {:?}", other),
        }
        for _ in 0..10 {
            assert_eq!(registry.resolve_for("defs.h").unwrap().id(), "x");
        }
        // A fresh registry with the same registration order agrees
        assert_eq!(ambiguous_registry().resolve_for("defs.h").unwrap().id(), "x");
    }

    #[test]
    fn test_builtin_header_is_ambiguous() {
        let registry = LexerRegistry::from_catalog(&BuiltinCatalog).unwrap();
        assert!(matches!(registry.select_for("stdio.h"), LexerResolution::Ambiguous(_)));
        assert_eq!(registry.resolve_for("stdio.h").unwrap().id(), "c");
        assert_eq!(registry.resolve_for("test.py").unwrap().id(), "python");
        assert_eq!(registry.resolve_for("test.json").unwrap().id(), "json");
        assert_eq!(registry.resolve_for("Cargo.lock").unwrap().id(), "toml");
        assert!(registry.matches_any("main.rs"));
        assert!(registry.matches_any("app.js"));
        assert!(!registry.matches_any("notes.txt"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let registry = ambiguous_registry();
        let err = registry.register(descriptor("x", &["*.q"])).unwrap_err();
        assert!(matches!(err, Error::DuplicateLexer(ref id) if id == "x"));
        assert_eq!(registry.ids(), vec!["x", "y"]);
    }

    #[test]
    fn test_mode_cache_keyed_by_lexer() {
        let registry = ambiguous_registry();
        let a = registry.mode_for_file("one.x").unwrap();
        let b = registry.mode_for_file("two.x").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        // defs.h resolves to x as well
        let c = registry.mode_for_file("defs.h").unwrap();
        assert!(Arc::ptr_eq(&a, &c));
        assert_eq!(registry.cached_modes(), 1);
        assert!(registry.mode_for_file("none.z").is_none());
    }

    #[test]
    fn test_concurrent_first_lookup_shares_mode() {
        let registry = Arc::new(ambiguous_registry());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.mode_for_file("race.y").unwrap())
            })
            .collect();
        let modes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for mode in &modes[1..] {
            assert!(Arc::ptr_eq(&modes[0], mode));
        }
        assert_eq!(registry.cached_modes(), 1);
    }

    #[test]
    fn test_plain_mode_uses_default_mapping() {
        let mapping: StyleMapping = [("Comment", "comment")].into_iter().collect();
        let registry = LexerRegistry::with_mapping(mapping);
        let plain = registry.plain_mode();
        assert!(plain.lexer().is_none());
        assert_eq!(plain.mapping().get("Comment"), Some("comment"));
        assert!(Arc::ptr_eq(&plain, &registry.plain_mode()));
        // Never stored in the per-lexer cache
        assert_eq!(registry.cached_modes(), 0);
    }

    #[test]
    fn test_register_mode() {
        let registry = ambiguous_registry();
        let mapping: StyleMapping = [("Keyword", "keyword")].into_iter().collect();
        let mode = registry.register_mode("y", mapping.clone()).unwrap();
        assert_eq!(mode.lexer().unwrap().id(), "y");
        assert_eq!(mode.mapping().as_ref(), &mapping);

        let err = registry.register_mode("nope", StyleMapping::new()).unwrap_err();
        assert!(matches!(err, Error::UnknownLexer(_)));
    }
}
