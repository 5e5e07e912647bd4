use ahash::{HashSet, HashSetExt};
use compact_str::{CompactString, ToCompactString};
use serde_json::Value;

use crate::{error::{ErrorKind, Result}, metadata::manifest::{DependencyKind, Manifest}};

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub name: CompactString,
    pub version: String,
    pub source: DependencyKind,
}

#[derive(Debug)]
pub struct Injection {
    pub kind: DependencyKind,
    pub resolved: Vec<Resolved>,
}

/// Looks every name up in the root manifest, trying tables in `DependencyKind::PRECEDENCE` order.
///
/// Duplicate names collapse onto their first occurrence. On failure the error lists every
/// unresolved name in request order.
pub fn resolve<S: AsRef<str>>(root: &Manifest, names: &[S]) -> Result<Vec<Resolved>> {
    let mut seen = HashSet::with_capacity(names.len());
    let mut resolved = Vec::with_capacity(names.len());
    let mut missing = Vec::new();

    for name in names {
        let name: &str = name.as_ref();
        if !seen.insert(name) {
            continue
        }

        let found = DependencyKind::PRECEDENCE.iter()
            .find_map(|&source| root.version_of(source, name).map(|v| (source, v)));

        match found {
            Some((source, version)) => resolved.push(Resolved {
                name: name.to_compact_string(),
                version: version.to_string(),
                source,
            }),
            None => missing.push(name.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(ErrorKind::MissingDependencies(missing))
    }

    Ok(resolved)
}

/// Pins each of `names` in the target's `kind` table to the root manifest's version.
///
/// The target is only touched once every name has resolved.
pub fn inject<S: AsRef<str>>(target: &mut Manifest, root: &Manifest, names: &[S], kind: DependencyKind) -> Result<Injection> {
    let resolved = resolve(root, names)?;

    target.extend_table(kind, resolved.iter()
        .map(|dep| (dep.name.to_string(), Value::String(dep.version.clone()))));

    Ok(Injection { kind, resolved })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn manifest(value: Value) -> Manifest {
        match value {
            Value::Object(fields) => fields.into(),
            _ => panic!("not an object"),
        }
    }

    fn root() -> Manifest {
        manifest(json!({
            "version": "6.0.0",
            "dependencies": { "typescript": "4.0.0" },
            "devDependencies": { "uglify-js": "3.1.0" }
        }))
    }

    #[test]
    fn pulls_from_both_tables() {
        let mut target = manifest(json!({ "dependencies": {} }));

        let injection = inject(&mut target, &root(), &["typescript", "uglify-js"], DependencyKind::Dependencies).unwrap();

        assert_eq!(target.get("dependencies"), Some(&json!({ "typescript": "4.0.0", "uglify-js": "3.1.0" })));
        assert_eq!(injection.resolved[0].source, DependencyKind::Dependencies);
        assert_eq!(injection.resolved[1].source, DependencyKind::DevDependencies);
    }

    #[test]
    fn missing_names_leave_target_untouched() {
        let mut target = manifest(json!({ "name": "pkg" }));
        let before = target.clone();

        let err = inject(&mut target, &root(), &["nope", "typescript", "missing-pkg"], DependencyKind::Dependencies).unwrap_err();

        match err {
            ErrorKind::MissingDependencies(names) => assert_eq!(names, vec!["nope", "missing-pkg"]),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(target, before);
    }

    #[test]
    fn missing_error_message_joins_names() {
        let err = resolve(&root(), &["typescript", "missing-pkg"]).unwrap_err();

        assert_eq!(err.to_string(), "missing dependencies \"missing-pkg\"");
    }

    #[test]
    fn runtime_version_wins_over_dev() {
        let root = manifest(json!({
            "dependencies": { "typescript": "4.0.0" },
            "devDependencies": { "typescript": "3.9.0" }
        }));
        let mut target = Manifest::default();

        inject(&mut target, &root, &["typescript"], DependencyKind::DevDependencies).unwrap();

        assert_eq!(target.version_of(DependencyKind::DevDependencies, "typescript"), Some("4.0.0"));
        assert!(target.table(DependencyKind::Dependencies).is_none());
    }

    #[test]
    fn duplicates_collapse() {
        let resolved = resolve(&root(), &["uglify-js", "typescript", "uglify-js"]).unwrap();

        let names: Vec<_> = resolved.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["uglify-js", "typescript"]);
    }

    #[test]
    fn empty_request_changes_nothing() {
        let mut target = manifest(json!({ "name": "pkg", "dependencies": { "a": "1" } }));
        let before = target.clone();

        let injection = inject::<&str>(&mut target, &root(), &[], DependencyKind::Dependencies).unwrap();

        assert!(injection.resolved.is_empty());
        assert_eq!(target, before);
    }

    #[test]
    fn injecting_twice_is_idempotent() {
        let mut target = manifest(json!({ "name": "pkg", "dependencies": { "typescript": "1.0.0", "left-pad": "1.3.0" } }));

        inject(&mut target, &root(), &["typescript", "uglify-js"], DependencyKind::Dependencies).unwrap();
        let once = target.clone();
        inject(&mut target, &root(), &["typescript", "uglify-js"], DependencyKind::Dependencies).unwrap();

        assert_eq!(target, once);
        assert_eq!(target.version_of(DependencyKind::Dependencies, "left-pad"), Some("1.3.0"));
    }

    #[test]
    fn root_without_tables_reports_everything_missing() {
        let err = resolve(&manifest(json!({ "name": "root" })), &["a", "b"]).unwrap_err();

        assert!(matches!(err, ErrorKind::MissingDependencies(names) if names == vec!["a", "b"]));
    }
}
