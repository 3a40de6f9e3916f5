use clap::Args;
use serde::Serialize;
use std::path::Path;

use unirename::defaults::{self, RenameDefaults};
use unirename::log_status;
use unirename::rename::{self, RenameRule, RenameSummary};
use unirename::scene::Scene;

use super::{CmdResult, GlobalArgs};

#[derive(Args, Debug, Default)]
pub struct RenameArgs {
    /// Text (or regular expression with --regex) to find
    #[arg(short, long)]
    pub find: String,

    /// Text to use as the replacement ($1 / ${name} reference regex groups)
    #[arg(short, long, default_value = "")]
    pub replace: String,

    /// Interpret --find as a regular expression
    #[arg(long, conflicts_with = "literal")]
    pub regex: bool,

    /// Interpret --find as plain text
    #[arg(long)]
    pub literal: bool,

    /// Perform replacement on objects
    #[arg(long, conflicts_with = "no_objects")]
    pub objects: bool,

    /// Leave objects alone
    #[arg(long)]
    pub no_objects: bool,

    /// Perform replacement on collections
    #[arg(long, conflicts_with = "no_collections")]
    pub collections: bool,

    /// Leave collections alone
    #[arg(long)]
    pub no_collections: bool,

    /// Just list replacements, but don't actually change anything
    #[arg(long, visible_alias = "test")]
    pub dry_run: bool,

    /// Scene document to rename (path, or - for stdin)
    #[arg(long, conflicts_with_all = ["object", "collection"])]
    pub scene: Option<String>,

    /// Object name to rename (repeatable)
    #[arg(long, value_name = "NAME")]
    pub object: Vec<String>,

    /// Collection name to rename (repeatable)
    #[arg(long, value_name = "NAME")]
    pub collection: Vec<String>,

    /// Write the renamed scene here instead of back to --scene
    #[arg(long, requires = "scene")]
    pub output: Option<String>,

    /// Store the mode and scope used here as the new defaults
    #[arg(long)]
    pub save_defaults: bool,
}

#[derive(Debug, Serialize)]
pub struct RenameOutput {
    pub command: String,
    pub rule: RenameRule,
    pub message: String,
    #[serde(flatten)]
    pub summary: RenameSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<Scene>,
    pub defaults_saved: bool,
}

enum SceneSource {
    File(String),
    Stdin,
    Names,
}

pub fn run(args: RenameArgs, _global: &GlobalArgs) -> CmdResult<RenameOutput> {
    let config = defaults::load_config();
    let rule = build_rule(&args, &config.rename);

    // Validate before reading the scene so a bad rule never touches anything.
    rename::validate(&rule)?;

    let (scene, source) = load_scene(&args)?;
    let output = rename_scene(&args, rule, scene, source)?;
    Ok((output, 0))
}

/// Rename a loaded scene, then write it back, echo it, or leave it, by source.
fn rename_scene(
    args: &RenameArgs,
    rule: RenameRule,
    mut scene: Scene,
    source: SceneSource,
) -> unirename::Result<RenameOutput> {
    let summary = scene.rename_selection(&rule)?;

    for outcome in &summary.outcomes {
        log_status!("rename", "* {}", outcome.describe());
    }
    log_status!("rename", "{}", summary.message());

    let mut written_to = None;
    let mut echoed_scene = None;
    if !rule.dry_run {
        match source {
            SceneSource::File(path) => {
                let target = args.output.clone().unwrap_or(path);
                scene.save(Path::new(&target))?;
                written_to = Some(target);
            }
            SceneSource::Stdin => echoed_scene = Some(scene),
            SceneSource::Names => {}
        }
    }

    if args.save_defaults {
        let mut config = defaults::load_config();
        config.rename = RenameDefaults::from_rule(&rule);
        defaults::save_config(&config)?;
    }

    Ok(RenameOutput {
        command: "rename".to_string(),
        message: summary.message(),
        rule,
        summary,
        written_to,
        scene: echoed_scene,
        defaults_saved: args.save_defaults,
    })
}

/// Command-line flags win; anything not given falls back to saved defaults.
fn build_rule(args: &RenameArgs, defaults: &RenameDefaults) -> RenameRule {
    let mut rule = defaults.to_rule(&args.find, &args.replace);
    rule.use_regex = resolve_flag(args.regex, args.literal, rule.use_regex);
    rule.include_objects = resolve_flag(args.objects, args.no_objects, rule.include_objects);
    rule.include_collections =
        resolve_flag(args.collections, args.no_collections, rule.include_collections);
    rule.dry_run = args.dry_run;
    rule
}

fn resolve_flag(on: bool, off: bool, default: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        default
    }
}

fn load_scene(args: &RenameArgs) -> unirename::Result<(Scene, SceneSource)> {
    if let Some(source) = &args.scene {
        let scene = Scene::load(source)?;
        let origin = if source.trim() == "-" {
            SceneSource::Stdin
        } else {
            let path = source.strip_prefix('@').unwrap_or(source);
            SceneSource::File(path.to_string())
        };
        return Ok((scene, origin));
    }

    if args.object.is_empty() && args.collection.is_empty() {
        return Err(unirename::Error::validation_missing_argument(vec![
            "--scene".to_string(),
            "--object".to_string(),
            "--collection".to_string(),
        ])
        .with_hint("Pass a scene document with --scene, or names with --object/--collection"));
    }

    Ok((
        Scene::from_names(&args.object, &args.collection),
        SceneSource::Names,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // HOME is process-wide; tests that read or write saved defaults take this lock.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const SCENE: &str = r#"{
        "items": [
            { "kind": "collection", "name": "Cube Set" },
            { "kind": "object", "name": "Cube" },
            { "kind": "object", "name": "Sphere" }
        ]
    }"#;

    /// Point the config directory at a fresh tempdir for the life of the guard.
    fn sandboxed_home() -> (std::sync::MutexGuard<'static, ()>, tempfile::TempDir) {
        let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let home = tempfile::tempdir().unwrap();
        std::env::set_var("HOME", home.path());
        std::env::set_var("APPDATA", home.path());
        (lock, home)
    }

    fn scene_file(dir: &Path) -> String {
        let path = dir.join("scene.json");
        std::fs::write(&path, SCENE).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn names_in(path: &str) -> Vec<String> {
        Scene::load(path)
            .unwrap()
            .items
            .into_iter()
            .map(|item| item.name)
            .collect()
    }

    fn args(find: &str, replace: &str) -> RenameArgs {
        RenameArgs {
            find: find.to_string(),
            replace: replace.to_string(),
            ..RenameArgs::default()
        }
    }

    #[test]
    fn unset_flags_use_saved_defaults() {
        let saved = RenameDefaults {
            use_regex: true,
            include_objects: false,
            include_collections: true,
        };
        let rule = build_rule(&args("a", "b"), &saved);
        assert!(rule.use_regex);
        assert!(!rule.include_objects);
        assert!(rule.include_collections);
        assert!(!rule.dry_run);
    }

    #[test]
    fn flags_override_saved_defaults() {
        let saved = RenameDefaults {
            use_regex: true,
            include_objects: false,
            include_collections: true,
        };
        let mut a = args("a", "b");
        a.literal = true;
        a.objects = true;
        a.no_collections = true;
        a.dry_run = true;

        let rule = build_rule(&a, &saved);
        assert!(!rule.use_regex);
        assert!(rule.include_objects);
        assert!(!rule.include_collections);
        assert!(rule.dry_run);
    }

    #[test]
    fn names_without_scene_become_selected_items() {
        let mut a = args("Cube", "Box");
        a.object = vec!["Cube".to_string(), "Sphere".to_string()];
        a.collection = vec!["Cube Set".to_string()];

        let (mut scene, _) = load_scene(&a).unwrap();
        let summary = scene
            .rename_selection(&build_rule(&a, &RenameDefaults::default()))
            .unwrap();

        assert_eq!(summary.message(), "Renamed 1 object(s) and 1 collection(s)");
    }

    #[test]
    fn no_items_is_missing_argument() {
        let err = load_scene(&args("Cube", "Box")).err().unwrap();
        assert_eq!(err.code, unirename::ErrorCode::ValidationMissingArgument);
    }

    #[test]
    fn writes_renamed_scene_back_to_source() {
        let (_lock, home) = sandboxed_home();
        let path = scene_file(home.path());
        let mut a = args("Cube", "Box");
        a.scene = Some(path.clone());

        let (output, exit_code) = run(a, &GlobalArgs {}).unwrap();

        assert_eq!(exit_code, 0);
        assert_eq!(output.written_to.as_deref(), Some(path.as_str()));
        assert_eq!(output.summary.total_changed(), 2);
        assert_eq!(names_in(&path), vec!["Box Set", "Box", "Sphere"]);
    }

    #[test]
    fn dry_run_leaves_scene_file_byte_identical() {
        let (_lock, home) = sandboxed_home();
        let path = scene_file(home.path());
        let mut a = args("Cube", "Box");
        a.scene = Some(path.clone());
        a.dry_run = true;

        let (output, _) = run(a, &GlobalArgs {}).unwrap();

        assert_eq!(output.written_to, None);
        assert_eq!(output.message, "Would rename 1 object(s) and 1 collection(s)");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SCENE);
    }

    #[test]
    fn output_flag_receives_document_and_source_is_untouched() {
        let (_lock, home) = sandboxed_home();
        let path = scene_file(home.path());
        let target = home.path().join("renamed").join("out.json");
        let target = target.to_str().unwrap().to_string();
        let mut a = args("Cube", "Box");
        a.scene = Some(path.clone());
        a.output = Some(target.clone());

        let (output, _) = run(a, &GlobalArgs {}).unwrap();

        assert_eq!(output.written_to.as_deref(), Some(target.as_str()));
        assert_eq!(names_in(&target), vec!["Box Set", "Box", "Sphere"]);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SCENE);
    }

    #[test]
    fn stdin_scene_is_echoed_not_written() {
        let (_lock, _home) = sandboxed_home();
        let scene = Scene::from_json(SCENE).unwrap();
        let a = args("Cube", "Box");
        let rule = build_rule(&a, &RenameDefaults::default());

        let output = rename_scene(&a, rule, scene, SceneSource::Stdin).unwrap();

        assert_eq!(output.written_to, None);
        let echoed = output.scene.unwrap();
        assert_eq!(echoed.items[0].name, "Box Set");
        assert_eq!(echoed.items[1].name, "Box");
    }

    #[test]
    fn stdin_dry_run_echoes_nothing() {
        let (_lock, _home) = sandboxed_home();
        let scene = Scene::from_json(SCENE).unwrap();
        let mut a = args("Cube", "Box");
        a.dry_run = true;
        let rule = build_rule(&a, &RenameDefaults::default());

        let output = rename_scene(&a, rule, scene, SceneSource::Stdin).unwrap();

        assert!(output.scene.is_none());
    }

    #[test]
    fn save_defaults_stores_mode_and_scope_but_not_dry_run() {
        let (_lock, home) = sandboxed_home();
        let path = scene_file(home.path());
        let mut a = args("^Cube$", "Box");
        a.scene = Some(path.clone());
        a.regex = true;
        a.no_collections = true;
        a.dry_run = true;
        a.save_defaults = true;

        let (output, _) = run(a, &GlobalArgs {}).unwrap();
        assert!(output.defaults_saved);

        let saved = defaults::load_config_strict().unwrap();
        assert_eq!(
            saved.rename,
            RenameDefaults {
                use_regex: true,
                include_objects: true,
                include_collections: false,
            }
        );
        let raw = std::fs::read_to_string(defaults::config_path().unwrap()).unwrap();
        assert!(!raw.contains("dry_run"));

        // The next run picks the saved mode and scope up and is not a dry run.
        let mut next = args("^Cube$", "Box");
        next.scene = Some(path.clone());
        let (output, _) = run(next, &GlobalArgs {}).unwrap();
        assert!(output.rule.use_regex);
        assert!(!output.rule.include_collections);
        assert!(!output.rule.dry_run);
        assert_eq!(names_in(&path), vec!["Cube Set", "Box", "Sphere"]);
    }

    #[test]
    fn invalid_regex_fails_before_the_file_is_touched() {
        let (_lock, home) = sandboxed_home();
        let path = scene_file(home.path());
        let mut a = args("Cube(", "Box");
        a.scene = Some(path.clone());
        a.regex = true;

        let err = run(a, &GlobalArgs {}).err().unwrap();

        assert_eq!(err.code, unirename::ErrorCode::RenameInvalidPattern);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SCENE);
    }
}
