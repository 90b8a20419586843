//! # Shell Adapter
//!
//! A line-oriented front end for the router. Reads commands from stdin,
//! turns them into `NavigationAction`s (or local queries) and prints the
//! focused route after each one.
//!
//! This is the only module that talks to a terminal. Two targets:
//!
//! - **App**: the adoption catalog's drawer → stack → tabs tree.
//! - **Harness**: a `TestNavigator` of the chosen kind, whose focus intent
//!   is flipped with `focus NAME true|false`. Every command counts as a host
//!   re-render, so the focus synchronizer runs after each one.
//!
//! The adopted set is loaded when the shell mounts and saved when it unmounts.
//! If the load failed, unmount leaves the stored file alone.

pub mod command;

use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::catalog::list::{annotate_distances, search, sort_by_distance};
use crate::catalog::{
    AdoptionStorage, AdoptionStore, Dog, DogSource, FixedLocation, JsonFileStorage,
    LocationProvider, SAMPLE_ORIGIN, StaticSource, StorageError,
};
use crate::core::action::NavigationAction;
use crate::core::config::ResolvedConfig;
use crate::core::descriptor::{ScreenRegistry, resolve_descriptors};
use crate::core::error::ConfigurationError;
use crate::core::navigator::Navigator;
use crate::core::route::NavigatorConfig;
use crate::core::state::NavigationState;
use crate::harness::{TestNavigator, TestNavigatorOptions};
use crate::screens;
use crate::shell::command::{Command, CommandError, HELP, parse};

const PROMPT: &str = "waypost> ";

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("no dog called {0} in the catalog")]
    UnknownDog(String),
    #[error("`focus` needs a test navigator (start with --kind)")]
    FocusUnavailable,
    #[error("failed to print state: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Print(String),
    Quit,
}

enum Target {
    App(Navigator),
    Harness(TestNavigator<String>),
}

pub struct Shell {
    target: Target,
    screens: ScreenRegistry<String>,
    dogs: Vec<Dog>,
    adoption: AdoptionStore,
    /// False when the stored set could not be read; it must not be overwritten.
    adoption_loaded: bool,
}

impl Shell {
    /// Mounts the navigator, fetches the catalog and loads the adopted set.
    ///
    /// Catalog and storage failures are logged and leave the list (or set)
    /// empty; only a bad route configuration fails the mount.
    pub async fn mount(
        config: &ResolvedConfig,
        source: &dyn DogSource,
        location: &dyn LocationProvider,
        storage: &dyn AdoptionStorage,
    ) -> Result<Self, ShellError> {
        let target = match config.harness_kind {
            None => Target::App(Navigator::new(Arc::new(screens::app_navigator()?))),
            Some(kind) => {
                let options = TestNavigatorOptions {
                    kind,
                    name: config.screen_name.clone(),
                    dummy_name: config.dummy_route.clone(),
                    ..Default::default()
                };
                let screen = TestNavigator::mount(
                    options,
                    |route| match &route.params {
                        Some(params) => format!("{} {}", route.name, Value::Object(params.clone())),
                        None => route.name.clone(),
                    },
                    |route| format!("{} (background)", route.name),
                )?;
                Target::Harness(screen)
            }
        };

        let mut dogs = match source.fetch_list().await {
            Ok(dogs) => dogs,
            Err(e) => {
                warn!("Catalog unavailable: {}", e);
                Vec::new()
            }
        };
        match location.location().await {
            Ok(origin) => {
                annotate_distances(&mut dogs, origin);
                sort_by_distance(&mut dogs);
            }
            Err(e) => warn!("No location, catalog left unsorted: {}", e),
        }

        let mut adoption = AdoptionStore::new();
        let adoption_loaded = match adoption.load(storage).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to load adopted dogs, stored set will be left untouched: {}", e);
                false
            }
        };

        info!("Shell mounted with {} dogs, {} adopted", dogs.len(), adoption.len());
        Ok(Self {
            target,
            screens: screens::screen_registry(),
            dogs,
            adoption,
            adoption_loaded,
        })
    }

    /// Saves the adopted set, unless it never loaded.
    pub async fn unmount(self, storage: &dyn AdoptionStorage) -> Result<(), ShellError> {
        if self.adoption_loaded {
            self.adoption.save(storage).await?;
        } else {
            warn!(
                "Adopted set was not loaded, discarding {} unsaved adoptions",
                self.adoption.len()
            );
        }
        info!("Shell unmounted");
        Ok(())
    }

    pub fn navigator(&self) -> &Navigator {
        match &self.target {
            Target::App(navigator) => navigator,
            Target::Harness(harness) => harness.navigator(),
        }
    }

    pub fn adoption(&self) -> &AdoptionStore {
        &self.adoption
    }

    /// `Main > Home > Adoptar`, plus a marker when the drawer is open.
    pub fn focused_line(&self) -> String {
        let state = self.navigator().state();
        let mut line = state.focused_path().join(" > ");
        if state.drawer_open {
            line.push_str(" [drawer open]");
        }
        line
    }

    /// Runs one command.
    pub fn execute(&mut self, command: Command) -> Result<Effect, ShellError> {
        debug!("Shell command: {:?}", command);
        if let Some(action) = command.to_action() {
            let action = self.resolve_focused_key(action);
            self.navigator().dispatch(action)?;
            return Ok(Effect::Print(self.after_navigation()?));
        }

        let output = match command {
            Command::Focus { name, focused } => {
                let Target::Harness(harness) = &mut self.target else {
                    return Err(ShellError::FocusUnavailable);
                };
                if name != harness.intent().desired_route_name {
                    return Err(ConfigurationError::UnknownRoute { name }.into());
                }
                match harness.set_focused(focused)? {
                    Some(action) => format!("focus sync: {}", describe_action(&action)),
                    None => String::new(),
                }
            }
            Command::Dogs(query) => {
                let hits = search(&self.dogs, query.as_deref().unwrap_or(""));
                hits.iter()
                    .map(|dog| self.dog_line(dog))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Command::Adopt(name) => self.adopt(&name)?,
            Command::Release(name) => {
                if self.adoption.remove(&name) {
                    format!("released {name}")
                } else {
                    format!("{name} was not adopted")
                }
            }
            Command::Adopted => {
                if self.adoption.is_empty() {
                    "no adopted dogs".to_string()
                } else {
                    self.adoption
                        .dogs()
                        .iter()
                        .map(|a| format!("{} (since {})", a.dog.summary(), a.adopted_at.format("%Y-%m-%d")))
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            Command::State => serde_json::to_string_pretty(&*self.navigator().state())?,
            Command::Describe => self.describe()?.join("\n"),
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Effect::Quit),
            // Navigation commands were handled above.
            _ => String::new(),
        };
        Ok(Effect::Print(output))
    }

    /// Reads commands from `input` until EOF or `quit`, writing to `output`.
    /// Command errors are printed and the loop carries on.
    pub async fn drive<R, W>(&mut self, input: R, output: &mut W) -> Result<(), ShellError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        output
            .write_all(format!("{}\n{PROMPT}", self.focused_line()).as_bytes())
            .await?;
        output.flush().await?;

        while let Some(line) = lines.next_line().await? {
            let result = parse(&line)
                .map_err(ShellError::from)
                .and_then(|command| match command {
                    Some(command) => self.execute(command),
                    None => Ok(Effect::Print(String::new())),
                });

            let text = match result {
                Ok(Effect::Quit) => break,
                Ok(Effect::Print(text)) => text,
                Err(e) => {
                    warn!("Shell command failed: {}", e);
                    format!("error: {e}")
                }
            };
            if !text.is_empty() {
                output.write_all(text.as_bytes()).await?;
                output.write_all(b"\n").await?;
            }
            output
                .write_all(format!("{}\n{PROMPT}", self.focused_line()).as_bytes())
                .await?;
            output.flush().await?;
        }
        output.write_all(b"\n").await?;
        output.flush().await?;
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// `params . {...}` targets the focused leaf route.
    fn resolve_focused_key(&self, action: NavigationAction) -> NavigationAction {
        match action {
            NavigationAction::SetParams { key, params } if key == "." => {
                let state = self.navigator().state();
                let key = state
                    .focused_leaf()
                    .focused_route()
                    .map(|r| r.key.clone())
                    .unwrap_or(key);
                NavigationAction::SetParams { key, params }
            }
            other => other,
        }
    }

    /// Host re-render: the harness gets to pull focus back where its intent says.
    fn after_navigation(&mut self) -> Result<String, ShellError> {
        match &mut self.target {
            Target::App(_) => Ok(String::new()),
            Target::Harness(harness) => Ok(match harness.rerender()? {
                Some(action) => format!("focus sync: {}", describe_action(&action)),
                None => String::new(),
            }),
        }
    }

    fn adopt(&mut self, name: &str) -> Result<String, ShellError> {
        let dog = self
            .dogs
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ShellError::UnknownDog(name.to_string()))?;
        if let Some(unavailable) = &dog.unavailable {
            return Ok(format!(
                "{} is not adoptable until {} ({:?})",
                dog.name, unavailable.available_from, unavailable.reason
            ));
        }
        let dog = dog.clone();
        let dog_name = dog.name.clone();
        Ok(if self.adoption.add(dog) {
            format!("adopted {dog_name}")
        } else {
            format!("{dog_name} is already adopted")
        })
    }

    fn dog_line(&self, dog: &Dog) -> String {
        let distance = dog
            .distance_km
            .map(|d| format!("{d:.2} km"))
            .unwrap_or_else(|| "? km".to_string());
        let status = if self.adoption.is_adopted(&dog.name) {
            "adopted"
        } else if dog.is_adoptable() {
            "available"
        } else {
            "not available"
        };
        format!("{:<10} {:>9}  {}  [{}]", dog.name, distance, dog.summary(), status)
    }

    /// One line per navigator along the focused chain: kind, rendered screen, options.
    fn describe(&self) -> Result<Vec<String>, ShellError> {
        match &self.target {
            Target::Harness(harness) => Ok(harness.render()?),
            Target::App(navigator) => {
                let root = navigator.state();
                Ok(describe_chain(&root, navigator.config(), &self.screens)?)
            }
        }
    }
}

fn describe_chain(
    root: &NavigationState,
    root_config: &NavigatorConfig,
    screens: &ScreenRegistry<String>,
) -> Result<Vec<String>, ConfigurationError> {
    let mut lines = Vec::new();
    let mut state = root;
    let mut config = root_config;
    while let Some(focused) = state.focused_route() {
        let descriptors = resolve_descriptors(state, &config.table, screens)?;
        if let Some(descriptor) = descriptors.get(&focused.key) {
            lines.push(format!(
                "{:<6} {} | {} | {}",
                config.kind.as_str(),
                focused.name,
                descriptor.render(),
                Value::Object(descriptor.options.clone())
            ));
        }
        match (focused.state.as_deref(), config.child(&focused.name)) {
            (Some(child_state), Some(child_config)) => {
                state = child_state;
                config = child_config;
            }
            _ => break,
        }
    }
    Ok(lines)
}

fn describe_action(action: &NavigationAction) -> String {
    match action.target_name() {
        Some(name) => format!("navigate {name}"),
        None => format!("{action:?}"),
    }
}

/// Runs the shell on stdin/stdout until EOF or `quit`.
pub async fn run(config: ResolvedConfig) -> Result<(), ShellError> {
    let storage = JsonFileStorage::new(&config.adopted_path);
    let source = StaticSource::sample();
    let location = FixedLocation(SAMPLE_ORIGIN);

    let mut shell = Shell::mount(&config, &source, &location, &storage).await?;
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let result = shell.drive(stdin, &mut stdout).await;

    // Save even if the loop failed part-way.
    shell.unmount(&storage).await?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::UnavailableReason;
    use crate::core::router::RouterKind;
    use crate::test_support::resolved_config;
    use chrono::NaiveDate;

    async fn mount(kind: Option<RouterKind>) -> (Shell, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("adopted.json"));
        let source = StaticSource::new(vec![
            Dog::new("Luna", "Husky", "l.jpg"),
            Dog::new("Thor", "Akita", "t.jpg").unavailable(
                UnavailableReason::TooYoung,
                NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            ),
        ]);
        let shell = Shell::mount(
            &resolved_config(kind, dir.path()),
            &source,
            &FixedLocation(SAMPLE_ORIGIN),
            &storage,
        )
        .await
        .unwrap();
        (shell, dir)
    }

    fn run(shell: &mut Shell, line: &str) -> Result<Effect, ShellError> {
        shell.execute(parse(line).unwrap().unwrap())
    }

    #[tokio::test]
    async fn test_app_starts_on_catalog_tab() {
        let (shell, _dir) = mount(None).await;
        assert_eq!(shell.focused_line(), "Main > Home > Adoptar");
    }

    #[tokio::test]
    async fn test_navigate_to_details_and_back() {
        let (mut shell, _dir) = mount(None).await;
        run(&mut shell, r#"navigate DogDetails {"dog": {"name": "Luna"}}"#).unwrap();
        assert_eq!(shell.focused_line(), "Main > DogDetails");
        run(&mut shell, "back").unwrap();
        assert_eq!(shell.focused_line(), "Main > Home > Adoptar");
    }

    #[tokio::test]
    async fn test_unknown_route_is_an_error() {
        let (mut shell, _dir) = mount(None).await;
        let err = run(&mut shell, "navigate Nowhere").unwrap_err();
        assert!(matches!(
            err,
            ShellError::Configuration(ConfigurationError::UnknownRoute { .. })
        ));
        assert_eq!(shell.focused_line(), "Main > Home > Adoptar");
    }

    #[tokio::test]
    async fn test_state_prints_json_tree() {
        let (mut shell, _dir) = mount(None).await;
        let Effect::Print(text) = run(&mut shell, "state").unwrap() else {
            panic!("state should print");
        };
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["kind"], "drawer");
        assert_eq!(value["routes"][0]["state"]["routes"][0]["name"], "Home");
    }

    #[tokio::test]
    async fn test_drawer_marker() {
        let (mut shell, _dir) = mount(None).await;
        run(&mut shell, "drawer open").unwrap();
        assert!(shell.focused_line().ends_with("[drawer open]"));
    }

    #[tokio::test]
    async fn test_describe_walks_focused_chain() {
        let (mut shell, _dir) = mount(None).await;
        run(&mut shell, r#"navigate DogDetails {"dog": {"name": "Luna", "breed": "Husky"}}"#)
            .unwrap();
        let Effect::Print(text) = run(&mut shell, "describe").unwrap() else {
            panic!("describe should print");
        };
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("drawer Main"));
        assert!(lines[1].contains("Luna es de raza Husky"));
        assert!(lines[1].contains(r#""title":"Luna""#));
    }

    #[tokio::test]
    async fn test_params_dot_targets_focused_route() {
        let (mut shell, _dir) = mount(None).await;
        run(&mut shell, "navigate DogDetails").unwrap();
        run(&mut shell, r#"params . {"dog": {"name": "Coco"}}"#).unwrap();
        let state = shell.navigator().state();
        let focused = state.focused_leaf().focused_route().unwrap();
        assert_eq!(focused.params.as_ref().unwrap()["dog"]["name"], "Coco");
    }

    #[tokio::test]
    async fn test_adopt_and_release() {
        let (mut shell, _dir) = mount(None).await;
        assert_eq!(run(&mut shell, "adopt luna").unwrap(), Effect::Print("adopted Luna".into()));
        assert_eq!(
            run(&mut shell, "adopt Luna").unwrap(),
            Effect::Print("Luna is already adopted".into())
        );
        assert!(shell.adoption().is_adopted("Luna"));
        run(&mut shell, "release Luna").unwrap();
        assert!(!shell.adoption().is_adopted("Luna"));
    }

    #[tokio::test]
    async fn test_unavailable_dog_is_refused() {
        let (mut shell, _dir) = mount(None).await;
        let Effect::Print(text) = run(&mut shell, "adopt Thor").unwrap() else {
            panic!("adopt should print");
        };
        assert!(text.contains("not adoptable until 2026-12-01"));
        assert!(shell.adoption().is_empty());
    }

    #[tokio::test]
    async fn test_dogs_search_marks_status() {
        let (mut shell, _dir) = mount(None).await;
        run(&mut shell, "adopt Luna").unwrap();
        let Effect::Print(text) = run(&mut shell, "dogs").unwrap() else {
            panic!("dogs should print");
        };
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("[adopted]"));
        assert!(text.contains("[not available]"));

        let Effect::Print(text) = run(&mut shell, "dogs THO").unwrap() else {
            panic!("dogs should print");
        };
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("Thor"));
    }

    #[tokio::test]
    async fn test_unknown_dog() {
        let (mut shell, _dir) = mount(None).await;
        assert!(matches!(
            run(&mut shell, "adopt Rex").unwrap_err(),
            ShellError::UnknownDog(_)
        ));
    }

    #[tokio::test]
    async fn test_focus_needs_harness() {
        let (mut shell, _dir) = mount(None).await;
        assert!(matches!(
            run(&mut shell, "focus TestScreen false").unwrap_err(),
            ShellError::FocusUnavailable
        ));
    }

    #[tokio::test]
    async fn test_harness_focus_round_trip() {
        let (mut shell, _dir) = mount(Some(RouterKind::Stack)).await;
        assert_eq!(shell.focused_line(), "TestScreen");
        run(&mut shell, "focus TestScreen false").unwrap();
        assert_eq!(shell.focused_line(), "Dummy");
        run(&mut shell, "focus TestScreen true").unwrap();
        assert_eq!(shell.focused_line(), "TestScreen");
        assert!(run(&mut shell, "focus Other true").is_err());
    }

    #[tokio::test]
    async fn test_harness_pulls_focus_back_after_navigation() {
        let (mut shell, _dir) = mount(Some(RouterKind::Tabs)).await;
        let effect = run(&mut shell, "jump Dummy").unwrap();
        assert_eq!(effect, Effect::Print("focus sync: navigate TestScreen".into()));
        assert_eq!(shell.focused_line(), "TestScreen");
    }

    #[tokio::test]
    async fn test_drive_prints_focus_and_stops_on_quit() {
        let (mut shell, _dir) = mount(None).await;
        let input: &[u8] = b"navigate HowItWorks\nbogus\nquit\nnavigate DogDetails\n";
        let mut output = Vec::new();
        shell.drive(input, &mut output).await.unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Main > HowItWorks"));
        assert!(text.contains("error: unknown command: bogus"));
        assert!(!text.contains("DogDetails"));
    }

    #[tokio::test]
    async fn test_unmount_persists_adoptions() {
        let (mut shell, dir) = mount(None).await;
        run(&mut shell, "adopt Luna").unwrap();
        let storage = JsonFileStorage::new(dir.path().join("adopted.json"));
        shell.unmount(&storage).await.unwrap();

        let mut reloaded = AdoptionStore::new();
        reloaded.load(&storage).await.unwrap();
        assert!(reloaded.is_adopted("Luna"));
    }

    #[tokio::test]
    async fn test_unreadable_adopted_file_survives_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adopted.json");
        let stored = r#"[{"dog":{"name":"Max","breed":"Beagle","photo":"m.jpg","unavailable":{"reason":"injured","available_from":"2026-01-01"}},"adopted_at":"2026-01-01T00:00:00Z"}]"#;
        std::fs::write(&path, stored).unwrap();
        let storage = JsonFileStorage::new(&path);

        let mut shell = Shell::mount(
            &resolved_config(None, dir.path()),
            &StaticSource::new(vec![Dog::new("Luna", "Husky", "l.jpg")]),
            &FixedLocation(SAMPLE_ORIGIN),
            &storage,
        )
        .await
        .unwrap();
        assert!(shell.adoption().is_empty());
        run(&mut shell, "adopt Luna").unwrap();
        shell.unmount(&storage).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), stored);
    }
}
