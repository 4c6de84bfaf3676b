//! Integration tests for tplmap-core.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};

use tplmap_core::{
    application::ApplicationError,
    domain::{FORMAT_VERSION, Frame, Location, Source, SourceMap},
    prelude::*,
};

/// Loader over `(logical path, filename, content)` triples that counts loads.
#[derive(Default)]
struct CountingLoader {
    sources: HashMap<String, Source>,
    loads: AtomicUsize,
}

impl CountingLoader {
    fn with(mut self, path: &str, filename: &str, content: &str) -> Self {
        self.sources
            .insert(path.to_owned(), Source::new(filename, content));
        self
    }

    fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl Loader for CountingLoader {
    fn load(&self, path: &str) -> TplmapResult<Source> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.sources.get(path).cloned().ok_or_else(|| {
            ApplicationError::TemplateLoad {
                path: path.to_owned(),
                reason: "not registered".into(),
            }
            .into()
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.sources.contains_key(path)
    }
}

fn site() -> CountingLoader {
    CountingLoader::default()
        .with("layout", "/site/layout.tpl", "<html>\n<head></head>\n<body>\n{% block body %}\n</body>\n</html>\n")
        .with("page", "/site/page.tpl", "{% extends layout %}\n{% block body %}\n{% include nav %}\n<p>hi</p>\n{% endblock %}\n")
        .with("nav", "/site/nav.tpl", "<nav>\n  <a>home</a>\n</nav>\n")
        .with("./nav", "/site/nav.tpl", "<nav>\n  <a>home</a>\n</nav>\n")
}

/// Inclusion site of `page` inside `layout` (line 4).
fn in_layout() -> Location {
    Location::new("layout", 35)
}

/// Generated output: 6 lines.
const OUTPUT: &str = "<html>\n<head></head>\n<body>\n<nav>\n  <a>home</a>\n<p>hi</p>\n";

fn page_locations() -> BTreeMap<usize, Location> {
    BTreeMap::from([
        (0, Location::new("layout", 0)),
        // "<nav>" (output line 4) from nav.tpl, included by page line 3
        (
            28,
            Location::new("nav", 0).with_parent(Location::new("page", 38).with_parent(in_layout())),
        ),
        // "  <a>home</a>" (output line 5) through a second logical path
        (
            34,
            Location::new("./nav", 8).with_parent(Location::new("page", 38).with_parent(in_layout())),
        ),
        // "<p>hi</p>" (output line 6) from page line 4
        (
            48,
            Location::new("page", 56).with_parent(in_layout()),
        ),
    ])
}

#[test]
fn three_level_include_stack() {
    let loader = site();
    let map = SourceMap::calculate(OUTPUT, &page_locations(), &loader).unwrap();

    assert_eq!(
        map.stack(5),
        [
            Frame::new("/site/nav.tpl", 2),
            Frame::new("/site/page.tpl", 3),
            Frame::new("/site/layout.tpl", 4),
        ]
    );
    assert_eq!(
        map.stack(6),
        [
            Frame::new("/site/page.tpl", 4),
            Frame::new("/site/layout.tpl", 4),
        ]
    );
    // lines 2 and 3 fall back to the layout record on line 1
    assert_eq!(map.stack(3), [Frame::new("/site/layout.tpl", 1)]);
}

#[test]
fn logical_paths_load_once_filenames_dedupe() {
    let loader = site();
    let map = SourceMap::calculate(OUTPUT, &page_locations(), &loader).unwrap();

    // layout, nav, page, ./nav
    assert_eq!(loader.loads(), 4);
    assert_eq!(
        map.paths(),
        ["/site/layout.tpl", "/site/nav.tpl", "/site/page.tpl"]
    );
}

#[test]
fn stored_form_round_trips() {
    let map = SourceMap::calculate(OUTPUT, &page_locations(), &site()).unwrap();
    let encoded = map.serialize().unwrap();
    assert!(encoded.contains(&format!("\"version\":{FORMAT_VERSION}")));

    let restored = SourceMap::deserialize(encoded.as_bytes()).unwrap();
    assert_eq!(restored.paths(), map.paths());
    for line in 0..10 {
        assert_eq!(restored.stack(line), map.stack(line), "line {line}");
    }
}

#[test]
fn concurrent_calculations_are_independent() {
    let loader = Arc::new(site());
    let expected = SourceMap::calculate(OUTPUT, &page_locations(), loader.as_ref()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let loader = Arc::clone(&loader);
            thread::spawn(move || {
                SourceMap::calculate(OUTPUT, &page_locations(), loader.as_ref()).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn missing_include_is_fatal() {
    let locations = BTreeMap::from([(
        0,
        Location::new("nav", 0).with_parent(Location::new("gone", 0)),
    )]);

    let err = SourceMap::calculate(OUTPUT, &locations, &site()).unwrap_err();
    assert!(err.is_load());
    assert!(err.to_string().contains("gone"));
}

#[test]
fn finalized_maps_are_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SourceMap>();
    assert_send_sync::<TplmapError>();
}
