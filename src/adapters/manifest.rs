//! Manifest (`package.xml`) dependency domain.
//!
//! Manifests are discovered by walking a set of search-path roots and
//! indexing every `package.xml` found, first discovery of a name winning
//! (overlay ordering). A manifest's dependencies either name another
//! discovered manifest (traced recursively in this domain) or an
//! abstraction key, which is delegated to the [`KeyTracer`] through the
//! shared cache. Names unknown to both indexes are skipped with a warning.
//!
//! Dependency tags follow the ROS manifest format: the seven explicit
//! `*_depend` tags plus `<depend>`, which expands to a build, build-export
//! and exec dependency. `<group_depend>` is not resolved (group membership
//! is not available locally).

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::adapters::keys::{KeyDb, KeyTracer};
use crate::adapters::package::PackageIndex;
use crate::core::TraceError;
use crate::dot::Legend;
use crate::graph::{Edge, Node, NodeKind};
use crate::tracer::{Candidate, DependencyAdapter, TraceCache, Tracer};

/// Marker files that exclude a directory subtree from discovery.
const IGNORE_MARKERS: [&str; 2] = ["CATKIN_IGNORE", "COLCON_IGNORE"];

/// `package.xml` as deserialized; only the tags the tracer cares about.
#[derive(Debug, Deserialize)]
struct RawManifest {
    name: String,
    #[serde(default)]
    depend: Vec<String>,
    #[serde(default)]
    build_depend: Vec<String>,
    #[serde(default)]
    buildtool_depend: Vec<String>,
    #[serde(default)]
    build_export_depend: Vec<String>,
    #[serde(default)]
    buildtool_export_depend: Vec<String>,
    #[serde(default)]
    exec_depend: Vec<String>,
    #[serde(default)]
    test_depend: Vec<String>,
    #[serde(default)]
    doc_depend: Vec<String>,
}

/// A parsed manifest: its name and flattened, labeled dependencies.
#[derive(Debug)]
pub struct Manifest {
    /// Package name from the `<name>` tag.
    pub name: String,
    dependencies: Vec<Candidate>,
}

impl Manifest {
    /// Parse a `package.xml` file.
    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse manifest XML. `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self, TraceError> {
        let raw: RawManifest =
            quick_xml::de::from_str(text).map_err(|source| TraceError::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut dependencies = Vec::new();
        let mut extend = |names: &[String], label: &str| {
            dependencies.extend(names.iter().map(|name| Candidate::new(name, label)));
        };
        extend(&raw.build_depend, "build_depend");
        extend(&raw.buildtool_depend, "buildtool_depend");
        extend(&raw.build_export_depend, "build_export_depend");
        extend(&raw.buildtool_export_depend, "buildtool_export_depend");
        extend(&raw.exec_depend, "exec_depend");
        extend(&raw.test_depend, "test_depend");
        extend(&raw.doc_depend, "doc_depend");
        // <depend> is shorthand for build + build-export + exec.
        extend(&raw.depend, "build_depend");
        extend(&raw.depend, "build_export_depend");
        extend(&raw.depend, "exec_depend");

        Ok(Self {
            name: raw.name,
            dependencies,
        })
    }

    /// The manifest's dependencies as labeled candidates.
    pub fn dependencies(&self) -> &[Candidate] {
        &self.dependencies
    }
}

/// Index of manifests discovered under the search paths.
#[derive(Debug, Default)]
pub struct ManifestIndex {
    manifests: HashMap<String, Manifest>,
}

impl ManifestIndex {
    /// Walk `search_paths` and index every readable `package.xml`.
    ///
    /// Unreadable entries and unparseable manifests are skipped with a
    /// warning; an empty or missing root simply contributes nothing. The
    /// first manifest discovered under a given name wins, matching overlay
    /// search-path semantics.
    pub fn discover(search_paths: &[PathBuf]) -> Self {
        let mut index = Self::default();
        for root in search_paths {
            let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
                !entry.file_type().is_dir()
                    || !IGNORE_MARKERS.iter().any(|marker| entry.path().join(marker).exists())
            });
            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        warn!("skipping unreadable entry under {}: {err}", root.display());
                        continue;
                    }
                };
                if entry.file_type().is_file() && entry.file_name() == "package.xml" {
                    match Manifest::load(entry.path()) {
                        Ok(manifest) => index.insert(manifest, entry.path()),
                        Err(err) => warn!("skipping {}: {err}", entry.path().display()),
                    }
                }
            }
        }
        index
    }

    fn insert(&mut self, manifest: Manifest, path: &Path) {
        if self.manifests.contains_key(&manifest.name) {
            debug!(
                "'{}' already discovered, ignoring overlay at {}",
                manifest.name,
                path.display()
            );
            return;
        }
        self.manifests.insert(manifest.name.clone(), manifest);
    }

    /// Whether a manifest named `name` was discovered.
    pub fn contains(&self, name: &str) -> bool {
        self.manifests.contains_key(name)
    }

    /// Look up a discovered manifest.
    pub fn get(&self, name: &str) -> Option<&Manifest> {
        self.manifests.get(name)
    }

    /// Number of discovered manifests.
    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    /// Whether discovery found nothing.
    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}

/// Adapter wiring the manifest index and the key domain into the generic
/// tracer.
struct ManifestAdapter<'a> {
    manifests: &'a ManifestIndex,
    keys: &'a KeyDb,
    packages: &'a PackageIndex,
}

impl DependencyAdapter for ManifestAdapter<'_> {
    fn kind(&self) -> NodeKind {
        NodeKind::Manifest
    }

    fn contains(&self, name: &str) -> bool {
        self.manifests.contains(name)
    }

    // A manifest trace targets a binary package, not another manifest.
    fn resolve_target(&self, name: &str) -> Result<(), TraceError> {
        if self.packages.contains(name) {
            Ok(())
        } else {
            Err(TraceError::not_found(name, NodeKind::Package))
        }
    }

    fn direct_dependencies(&self, name: &str) -> Vec<Candidate> {
        self.manifests.get(name).map(|manifest| manifest.dependencies().to_vec()).unwrap_or_default()
    }

    fn trace_external(
        &self,
        name: &str,
        target: &str,
        cache: &mut TraceCache,
    ) -> Result<Option<(Node, bool)>, TraceError> {
        let tracer = KeyTracer::new(self.keys, self.packages);
        match tracer.trace_paths(name, target, cache) {
            Ok(_) => {
                let key_node = Node::new(name, NodeKind::Key);
                let leads = cache.leads_to_target(&key_node) == Some(true);
                Ok(Some((key_node, leads)))
            }
            // Not a key either: let the caller skip it as a missing
            // intermediate.
            Err(TraceError::NotFound {
                kind: NodeKind::Key,
                ..
            }) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Tracer over the manifest domain.
pub struct ManifestTracer<'a> {
    manifests: &'a ManifestIndex,
    keys: &'a KeyDb,
    packages: &'a PackageIndex,
}

impl<'a> ManifestTracer<'a> {
    /// Create a tracer over the three composed indexes.
    pub fn new(manifests: &'a ManifestIndex, keys: &'a KeyDb, packages: &'a PackageIndex) -> Self {
        Self {
            manifests,
            keys,
            packages,
        }
    }

    /// Trace dependency paths from manifest `start` to binary package
    /// `target`.
    ///
    /// # Errors
    ///
    /// [`TraceError::NotFound`] when `start` names no discovered manifest or
    /// `target` is absent from the package index.
    pub fn trace_paths(
        &self,
        start: &str,
        target: &str,
        cache: &mut TraceCache,
    ) -> Result<HashSet<Edge>, TraceError> {
        let adapter = ManifestAdapter {
            manifests: self.manifests,
            keys: self.keys,
            packages: self.packages,
        };
        Tracer::new(&adapter).trace_paths(start, target, cache)
    }
}

/// Legend fragment for manifest-domain edges and nodes.
pub fn legend() -> Legend {
    Legend::new()
        .with_edges(&[
            ("build_depend", "color=pink"),
            ("buildtool_depend", "color=pink"),
            ("build_export_depend", "color=pink"),
            ("buildtool_export_depend", "color=pink"),
            ("exec_depend", "color=pink"),
            ("test_depend", "color=pink"),
            ("doc_depend", "color=pink"),
        ])
        .with_nodes(&[(NodeKind::Manifest, "color=pink,shape=hexagon")])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::keys::KEY_LABEL;
    use std::fs;

    const NAV_XML: &str = r#"<?xml version="1.0"?>
<package format="3">
  <name>nav</name>
  <version>1.2.0</version>
  <description>Navigation stack</description>
  <depend>geometry</depend>
  <build_depend>cmake-helpers</build_depend>
  <test_depend>testkit</test_depend>
</package>
"#;

    const GEOMETRY_XML: &str = r#"<?xml version="1.0"?>
<package format="2">
  <name>geometry</name>
  <exec_depend>pyyaml</exec_depend>
</package>
"#;

    #[test]
    fn test_parse_reads_all_tags_with_labels() {
        let manifest = Manifest::parse(NAV_XML, Path::new("package.xml")).unwrap();
        assert_eq!(manifest.name, "nav");
        assert_eq!(
            manifest.dependencies(),
            &[
                Candidate::new("cmake-helpers", "build_depend"),
                Candidate::new("testkit", "test_depend"),
                Candidate::new("geometry", "build_depend"),
                Candidate::new("geometry", "build_export_depend"),
                Candidate::new("geometry", "exec_depend"),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_manifest_without_name() {
        let err = Manifest::parse("<package><depend>x</depend></package>", Path::new("p.xml"))
            .unwrap_err();
        assert!(matches!(err, TraceError::ManifestParse { .. }));
    }

    #[test]
    fn test_discover_indexes_and_first_discovery_wins() {
        let dir = tempfile::tempdir().unwrap();
        let overlay = dir.path().join("overlay/geometry");
        let underlay = dir.path().join("underlay/geometry");
        fs::create_dir_all(&overlay).unwrap();
        fs::create_dir_all(&underlay).unwrap();
        fs::write(overlay.join("package.xml"), GEOMETRY_XML).unwrap();
        fs::write(
            underlay.join("package.xml"),
            r#"<package><name>geometry</name><exec_depend>other</exec_depend></package>"#,
        )
        .unwrap();

        let index = ManifestIndex::discover(&[
            dir.path().join("overlay"),
            dir.path().join("underlay"),
        ]);
        assert_eq!(index.len(), 1);
        let geometry = index.get("geometry").unwrap();
        assert_eq!(geometry.dependencies(), &[Candidate::new("pyyaml", "exec_depend")]);
    }

    #[test]
    fn test_discover_honors_ignore_markers() {
        let dir = tempfile::tempdir().unwrap();
        let ignored = dir.path().join("ignored");
        fs::create_dir_all(&ignored).unwrap();
        fs::write(ignored.join("COLCON_IGNORE"), "").unwrap();
        fs::write(ignored.join("package.xml"), GEOMETRY_XML).unwrap();

        let index = ManifestIndex::discover(&[dir.path().to_path_buf()]);
        assert!(index.is_empty());
    }

    #[test]
    fn test_discover_skips_missing_roots() {
        let index = ManifestIndex::discover(&[PathBuf::from("/does/not/exist")]);
        assert!(index.is_empty());
    }

    fn cross_domain_fixtures(dir: &Path) -> (ManifestIndex, KeyDb, PackageIndex) {
        let nav = dir.join("nav");
        let geometry = dir.join("geometry");
        fs::create_dir_all(&nav).unwrap();
        fs::create_dir_all(&geometry).unwrap();
        fs::write(nav.join("package.xml"), NAV_XML).unwrap();
        fs::write(geometry.join("package.xml"), GEOMETRY_XML).unwrap();

        let index = ManifestIndex::discover(&[dir.to_path_buf()]);
        let keys = KeyDb::parse(
            "pyyaml: python3-yaml\ntestkit: testkit-bin\n",
            Path::new("keys.yaml"),
        )
        .unwrap();
        let packages = PackageIndex::parse(
            "\
Package: python3-yaml
Depends: python

Package: python

Package: testkit-bin
",
            Path::new("status"),
        )
        .unwrap();
        (index, keys, packages)
    }

    #[test]
    fn test_trace_crosses_manifest_key_and_package_domains() {
        let dir = tempfile::tempdir().unwrap();
        let (index, keys, packages) = cross_domain_fixtures(dir.path());
        let tracer = ManifestTracer::new(&index, &keys, &packages);
        let mut cache = TraceCache::new();

        let edges = tracer.trace_paths("nav", "python", &mut cache).unwrap();

        let nav = Node::new("nav", NodeKind::Manifest);
        let geometry = Node::new("geometry", NodeKind::Manifest);
        let pyyaml = Node::new("pyyaml", NodeKind::Key);
        assert!(edges.contains(&Edge::new(nav.clone(), "build_depend", geometry.clone())));
        assert!(edges.contains(&Edge::new(nav, "exec_depend", geometry.clone())));
        assert!(edges.contains(&Edge::new(geometry, "exec_depend", pyyaml.clone())));
        assert!(edges.contains(&Edge::new(
            pyyaml,
            KEY_LABEL,
            Node::new("python3-yaml", NodeKind::Package)
        )));
        assert!(edges.contains(&Edge::new(
            Node::new("python3-yaml", NodeKind::Package),
            "Depends",
            Node::new("python", NodeKind::Package)
        )));
        // cmake-helpers is neither a manifest nor a key: skipped, and
        // testkit's chain never reaches python.
        assert!(!edges.iter().any(|e| e.end.name == "cmake-helpers"));
        assert!(!edges.iter().any(|e| e.end.name == "testkit-bin"));
    }

    #[test]
    fn test_trace_missing_manifest_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (index, keys, packages) = cross_domain_fixtures(dir.path());
        let tracer = ManifestTracer::new(&index, &keys, &packages);
        let mut cache = TraceCache::new();

        let err = tracer.trace_paths("ghost", "python", &mut cache).unwrap_err();
        assert!(matches!(
            err,
            TraceError::NotFound {
                kind: NodeKind::Manifest,
                ..
            }
        ));
    }

    #[test]
    fn test_trace_target_validated_against_package_index() {
        let dir = tempfile::tempdir().unwrap();
        let (index, keys, packages) = cross_domain_fixtures(dir.path());
        let tracer = ManifestTracer::new(&index, &keys, &packages);
        let mut cache = TraceCache::new();

        let err = tracer.trace_paths("nav", "ghost", &mut cache).unwrap_err();
        assert!(matches!(
            err,
            TraceError::NotFound {
                kind: NodeKind::Package,
                ..
            }
        ));
    }
}
