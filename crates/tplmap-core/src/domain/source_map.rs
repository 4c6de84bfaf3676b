//! Source maps from generated output lines to template include stacks.
//!
//! A [`SourceMap`] is built once per compiled template with
//! [`SourceMap::calculate`], then either queried directly or serialized next
//! to the compiled template in a cache and decoded again before use.
//!
//! # Layout
//!
//! ```text
//! paths: ["/views/child.tpl", "/views/base.tpl"]
//! lines: {
//!   2 => ChainRecord { path: 0, line: 1, parent: Some(
//!          ChainRecord { path: 1, line: 2, parent: None }) },
//! }
//! ```
//!
//! Each chain record embeds its enclosing record by value, so a finalized map
//! holds no references to the compiler's locations or to loaded sources.
//!
//! # Wire format
//!
//! ```json
//! {"version":1,"paths":["/views/child.tpl","/views/base.tpl"],
//!  "lines":{"2":{"path":0,"line":1,"parent":{"path":1,"line":2,"parent":null}}}}
//! ```

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::{
    application::ports::Loader,
    domain::{DomainError, Location, Source},
    error::TplmapResult,
};

/// Version tag written by [`SourceMap::serialize`].
pub const FORMAT_VERSION: u32 = 1;

// ── Chain records ─────────────────────────────────────────────────────────────

/// Resolved form of a [`Location`] chain, referencing the path table by index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainRecord {
    /// Index into the owning map's path table.
    pub path: usize,
    /// 1-based line in that template.
    pub line: usize,
    /// Enclosing inclusion site, `None` at the root template.
    pub parent: Option<Box<ChainRecord>>,
}

impl ChainRecord {
    /// Iterate the chain innermost first.
    pub fn links(&self) -> impl Iterator<Item = &ChainRecord> {
        std::iter::successors(Some(self), |record| record.parent.as_deref())
    }

    pub fn depth(&self) -> usize {
        self.links().count()
    }
}

/// One entry of an include stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frame {
    pub file: String,
    pub line: usize,
}

impl Frame {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

// ── SourceMap ─────────────────────────────────────────────────────────────────

/// Maps generated-output lines to the chain of template locations that
/// produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMap {
    paths: Vec<String>,
    lines: BTreeMap<usize, ChainRecord>,
}

impl SourceMap {
    /// Build a map for `content` from the compiler's `offset → Location` table.
    ///
    /// Locations are visited in ascending offset order; the first location
    /// landing on a given output line wins. Every template is loaded at most
    /// once per call, keyed by its logical path.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error for the first template that cannot be
    /// resolved.
    #[instrument(skip_all, fields(locations = locations.len()))]
    pub fn calculate<L>(
        content: &str,
        locations: &BTreeMap<usize, Location>,
        loader: &L,
    ) -> TplmapResult<Self>
    where
        L: Loader + ?Sized,
    {
        let mut builder = Builder::new(loader);

        for (&offset, location) in locations {
            let line = Source::resolve_line(content, offset);
            if builder.map.lines.contains_key(&line) {
                trace!(offset, line, "output line already mapped");
                continue;
            }

            let record = builder.resolve(location)?;
            builder.map.lines.insert(line, record);
        }

        let map = builder.finish();
        debug!(
            lines = map.lines.len(),
            paths = map.paths.len(),
            "source map calculated"
        );
        Ok(map)
    }

    /// Every template file referenced by any recorded chain, first-seen order.
    pub fn paths(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in self.lines.values() {
            for link in record.links() {
                let file = self.paths[link.path].as_str();
                if !seen.contains(&file) {
                    seen.push(file);
                }
            }
        }
        seen
    }

    /// Include stack for an output line, innermost template first.
    ///
    /// Uses the closest recorded line at or before `line`, so any line of a
    /// multi-line statement resolves to the statement's start. Returns an
    /// empty stack when nothing is recorded at or before `line`.
    pub fn stack(&self, line: usize) -> Vec<Frame> {
        let Some((_, record)) = self.lines.range(..=line).next_back() else {
            return Vec::new();
        };

        record
            .links()
            .map(|link| Frame::new(self.paths[link.path].as_str(), link.line))
            .collect()
    }

    /// Recorded output lines with their chain records, ascending.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &ChainRecord)> {
        self.lines.iter().map(|(&line, record)| (line, record))
    }

    /// Number of recorded output lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Encode the map for storage next to a compiled template.
    pub fn serialize(&self) -> TplmapResult<String> {
        let encoded = Encoded {
            version: FORMAT_VERSION,
            paths: &self.paths,
            lines: &self.lines,
        };

        serde_json::to_string(&encoded).map_err(|e| {
            DomainError::Encode {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Decode a map produced by [`SourceMap::serialize`].
    ///
    /// # Errors
    ///
    /// Returns a decode error if the input is not valid JSON, lacks `paths`
    /// or `lines`, was written in another format version, or references a
    /// path index outside the path table.
    pub fn deserialize(bytes: impl AsRef<[u8]>) -> TplmapResult<Self> {
        let decoded: Decoded =
            serde_json::from_slice(bytes.as_ref()).map_err(|e| DomainError::Decode {
                reason: e.to_string(),
            })?;

        if decoded.version != FORMAT_VERSION {
            return Err(DomainError::UnsupportedVersion {
                found: decoded.version,
                expected: FORMAT_VERSION,
            }
            .into());
        }

        let map = Self {
            paths: decoded.paths,
            lines: decoded.lines,
        };
        map.validate()?;
        Ok(map)
    }

    fn validate(&self) -> Result<(), DomainError> {
        let len = self.paths.len();
        self.lines
            .values()
            .flat_map(ChainRecord::links)
            .find(|link| link.path >= len)
            .map_or(Ok(()), |link| {
                Err(DomainError::InvalidPathIndex {
                    index: link.path,
                    len,
                })
            })
    }
}

// ── Building state ────────────────────────────────────────────────────────────

/// Scratch state for one `calculate` call. Dropped by [`Builder::finish`].
struct Builder<'a, L: ?Sized> {
    loader: &'a L,
    sources: HashMap<String, Source>,
    path_index: HashMap<String, usize>,
    map: SourceMap,
}

impl<'a, L> Builder<'a, L>
where
    L: Loader + ?Sized,
{
    fn new(loader: &'a L) -> Self {
        Self {
            loader,
            sources: HashMap::new(),
            path_index: HashMap::new(),
            map: SourceMap::default(),
        }
    }

    /// Resolve a location chain into a nested chain record.
    ///
    /// Links are resolved innermost first (which fixes the path table order),
    /// then the parents are folded from the root inwards.
    fn resolve(&mut self, location: &Location) -> TplmapResult<ChainRecord> {
        let (path, line) = self.resolve_link(location)?;

        let mut enclosing = Vec::new();
        for link in location.ancestors().skip(1) {
            enclosing.push(self.resolve_link(link)?);
        }

        let parent = enclosing
            .into_iter()
            .rev()
            .fold(None, |parent, (path, line)| {
                Some(Box::new(ChainRecord { path, line, parent }))
            });

        Ok(ChainRecord { path, line, parent })
    }

    fn resolve_link(&mut self, link: &Location) -> TplmapResult<(usize, usize)> {
        let (filename, line) = {
            let source = self.load(&link.path)?;
            (source.filename().to_owned(), source.line_at(link.offset))
        };
        Ok((self.intern(filename), line))
    }

    fn load(&mut self, path: &str) -> TplmapResult<&Source> {
        if !self.sources.contains_key(path) {
            debug!(path, "loading template");
            let source = self.loader.load(path)?;
            self.sources.insert(path.to_owned(), source);
        }
        Ok(&self.sources[path])
    }

    fn intern(&mut self, filename: String) -> usize {
        if let Some(&index) = self.path_index.get(&filename) {
            return index;
        }
        let index = self.map.paths.len();
        self.map.paths.push(filename.clone());
        self.path_index.insert(filename, index);
        index
    }

    fn finish(self) -> SourceMap {
        self.map
    }
}

// ── Wire format ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Encoded<'a> {
    version: u32,
    paths: &'a [String],
    lines: &'a BTreeMap<usize, ChainRecord>,
}

#[derive(Deserialize)]
struct Decoded {
    #[serde(default = "default_version")]
    version: u32,
    paths: Vec<String>,
    lines: BTreeMap<usize, ChainRecord>,
}

fn default_version() -> u32 {
    FORMAT_VERSION
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::{ApplicationError, ports::MockLoader},
        error::TplmapError,
    };

    /// Loader over a fixed table of `logical path → (filename, content)`.
    struct FixtureLoader(HashMap<&'static str, (&'static str, &'static str)>);

    impl FixtureLoader {
        fn new(entries: &[(&'static str, &'static str, &'static str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|&(path, file, content)| (path, (file, content)))
                    .collect(),
            )
        }
    }

    impl Loader for FixtureLoader {
        fn load(&self, path: &str) -> TplmapResult<Source> {
            self.0
                .get(path)
                .map(|&(file, content)| Source::new(file, content))
                .ok_or_else(|| {
                    ApplicationError::TemplateLoad {
                        path: path.to_owned(),
                        reason: "not in fixture".into(),
                    }
                    .into()
                })
        }

        fn exists(&self, path: &str) -> bool {
            self.0.contains_key(path)
        }
    }

    const CONTENT: &str = "line1\nline2\nline3\n";
    // "base.tpl": byte 10 sits on line 2
    const BASE: &str = "<html>\n<body>{% block %}</body>\n</html>\n";

    fn views() -> FixtureLoader {
        FixtureLoader::new(&[
            ("child.tpl", "/views/child.tpl", "{% extends base %}\nhello\n"),
            ("base.tpl", "/views/base.tpl", BASE),
            ("layout", "/views/base.tpl", BASE),
            ("partial.tpl", "/views/partial.tpl", "a\nb\nc\nd\n"),
        ])
    }

    fn locations(entries: Vec<(usize, Location)>) -> BTreeMap<usize, Location> {
        entries.into_iter().collect()
    }

    /// Map with records on output lines 5, 10 and 20.
    fn floor_fixture() -> SourceMap {
        let content = "\n".repeat(30);
        let locs = locations(vec![
            (4, Location::new("partial.tpl", 0)),  // line 5 -> A
            (9, Location::new("partial.tpl", 2)),  // line 10 -> B
            (19, Location::new("partial.tpl", 4)), // line 20 -> C
        ]);
        SourceMap::calculate(&content, &locs, &views()).unwrap()
    }

    // ── calculate / end-to-end ────────────────────────────────────────────

    #[test]
    fn end_to_end_child_extending_base() {
        let locs = locations(vec![(
            6,
            Location::new("child.tpl", 0).with_parent(Location::new("base.tpl", 10)),
        )]);

        let map = SourceMap::calculate(CONTENT, &locs, &views()).unwrap();

        assert_eq!(map.paths(), ["/views/child.tpl", "/views/base.tpl"]);
        assert_eq!(
            map.stack(2),
            [
                Frame::new("/views/child.tpl", 1),
                Frame::new("/views/base.tpl", 2)
            ]
        );
        assert!(map.stack(1).is_empty());
    }

    #[test]
    fn empty_locations_give_empty_map() {
        let map = SourceMap::calculate(CONTENT, &BTreeMap::new(), &views()).unwrap();
        assert!(map.is_empty());
        assert!(map.paths().is_empty());
        assert!(map.stack(0).is_empty());
        assert!(map.stack(1).is_empty());
        assert!(map.stack(usize::MAX).is_empty());
    }

    #[test]
    fn first_location_on_a_line_wins() {
        let locs = locations(vec![
            (6, Location::new("partial.tpl", 0)),
            (8, Location::new("partial.tpl", 6)),
        ]);
        let map = SourceMap::calculate(CONTENT, &locs, &views()).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.stack(2), [Frame::new("/views/partial.tpl", 1)]);
    }

    #[test]
    fn out_of_range_offset_saturates_to_last_line() {
        let locs = locations(vec![(500, Location::new("partial.tpl", 999))]);
        let map = SourceMap::calculate(CONTENT, &locs, &views()).unwrap();
        let (line, record) = map.lines().next().unwrap();
        assert_eq!(line, 4);
        assert_eq!(record.line, 5);
    }

    #[test]
    fn chain_is_innermost_first() {
        let grandchild = Location::new("partial.tpl", 4).with_parent(
            Location::new("child.tpl", 20).with_parent(Location::new("base.tpl", 10)),
        );
        let map = SourceMap::calculate(CONTENT, &locations(vec![(0, grandchild)]), &views())
            .unwrap();

        assert_eq!(
            map.stack(1),
            [
                Frame::new("/views/partial.tpl", 3),
                Frame::new("/views/child.tpl", 2),
                Frame::new("/views/base.tpl", 2),
            ]
        );
    }

    #[test]
    fn paths_dedupe_by_filename_across_logical_paths() {
        let locs = locations(vec![
            (0, Location::new("base.tpl", 0)),
            (6, Location::new("layout", 10)),
        ]);
        let map = SourceMap::calculate(CONTENT, &locs, &views()).unwrap();

        assert_eq!(map.paths(), ["/views/base.tpl"]);
        assert_eq!(map.stack(1)[0].file, map.stack(2)[0].file);
        assert!(map.lines().all(|(_, r)| r.path == 0));
    }

    #[test]
    fn calculate_is_deterministic() {
        let locs = locations(vec![
            (12, Location::new("partial.tpl", 2).with_parent(Location::new("base.tpl", 10))),
            (0, Location::new("child.tpl", 0)),
            (6, Location::new("base.tpl", 30)),
        ]);
        let a = SourceMap::calculate(CONTENT, &locs, &views()).unwrap();
        let b = SourceMap::calculate(CONTENT, &locs, &views()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.serialize().unwrap(), b.serialize().unwrap());
    }

    #[test]
    fn each_logical_path_is_loaded_once() {
        let mut loader = MockLoader::new();
        loader
            .expect_load()
            .withf(|path| path == "base.tpl")
            .times(1)
            .returning(|_| Ok(Source::new("/views/base.tpl", BASE)));
        loader
            .expect_load()
            .withf(|path| path == "partial.tpl")
            .times(1)
            .returning(|_| Ok(Source::new("/views/partial.tpl", "a\nb\n")));

        let locs = locations(vec![
            (0, Location::new("partial.tpl", 0).with_parent(Location::new("base.tpl", 10))),
            (6, Location::new("partial.tpl", 2).with_parent(Location::new("base.tpl", 10))),
            (12, Location::new("base.tpl", 0)),
        ]);

        let map = SourceMap::calculate(CONTENT, &locs, &loader).unwrap();
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn load_error_propagates() {
        let locs = locations(vec![(
            0,
            Location::new("child.tpl", 0).with_parent(Location::new("missing.tpl", 0)),
        )]);

        let err = SourceMap::calculate(CONTENT, &locs, &views()).unwrap_err();
        match err {
            TplmapError::Application(ApplicationError::TemplateLoad { path, .. }) => {
                assert_eq!(path, "missing.tpl")
            }
            other => panic!("expected TemplateLoad, got {other:?}"),
        }
    }

    // ── stack ─────────────────────────────────────────────────────────────

    #[test]
    fn stack_uses_floor_lookup() {
        let map = floor_fixture();
        let a = map.stack(5);
        let b = map.stack(10);
        let c = map.stack(20);

        assert_eq!(map.stack(7), a);
        assert_eq!(b, [Frame::new("/views/partial.tpl", 2)]);
        assert_eq!(c, [Frame::new("/views/partial.tpl", 3)]);
        assert_eq!(map.stack(25), c);
        assert!(map.stack(3).is_empty());
    }

    // ── serialize / deserialize ───────────────────────────────────────────

    #[test]
    fn round_trip_preserves_queries() {
        let map = floor_fixture();
        let restored = SourceMap::deserialize(map.serialize().unwrap()).unwrap();

        assert_eq!(restored, map);
        assert_eq!(restored.paths(), map.paths());
        for line in 0..32 {
            assert_eq!(restored.stack(line), map.stack(line));
        }
    }

    #[test]
    fn serialized_form_is_versioned_json() {
        let locs = locations(vec![(
            6,
            Location::new("child.tpl", 0).with_parent(Location::new("base.tpl", 10)),
        )]);
        let map = SourceMap::calculate(CONTENT, &locs, &views()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&map.serialize().unwrap()).unwrap();

        assert_eq!(value["version"], FORMAT_VERSION);
        assert_eq!(value["paths"][1], "/views/base.tpl");
        assert_eq!(value["lines"]["2"]["parent"]["line"], 2);
    }

    #[test]
    fn deserialize_rejects_garbage() {
        let err = SourceMap::deserialize("not json").unwrap_err();
        assert!(matches!(err, TplmapError::Domain(DomainError::Decode { .. })));
    }

    #[test]
    fn deserialize_requires_paths_and_lines() {
        for input in [r#"{"lines":{}}"#, r#"{"paths":[]}"#] {
            let err = SourceMap::deserialize(input).unwrap_err();
            assert!(
                matches!(err, TplmapError::Domain(DomainError::Decode { .. })),
                "input {input} gave {err:?}"
            );
        }
    }

    #[test]
    fn deserialize_rejects_other_versions() {
        let err = SourceMap::deserialize(r#"{"version":7,"paths":[],"lines":{}}"#).unwrap_err();
        assert!(matches!(
            err,
            TplmapError::Domain(DomainError::UnsupportedVersion { found: 7, .. })
        ));
    }

    #[test]
    fn deserialize_rejects_dangling_path_index() {
        let input = r#"{"paths":["/a"],"lines":{"1":{"path":0,"line":1,"parent":{"path":3,"line":1,"parent":null}}}}"#;
        let err = SourceMap::deserialize(input).unwrap_err();
        assert!(matches!(
            err,
            TplmapError::Domain(DomainError::InvalidPathIndex { index: 3, len: 1 })
        ));
    }

    #[test]
    fn deserialize_accepts_missing_version() {
        let input = r#"{"paths":["/a"],"lines":{"3":{"path":0,"line":9,"parent":null}}}"#;
        let map = SourceMap::deserialize(input).unwrap();
        assert_eq!(map.stack(4), [Frame::new("/a", 9)]);
    }

    #[test]
    fn frame_displays_as_file_colon_line() {
        assert_eq!(Frame::new("/views/base.tpl", 2).to_string(), "/views/base.tpl:2");
    }
}
