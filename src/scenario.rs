//! Scripted dialog sessions
//!
//! A scenario describes a host page, the dialogs bound to it and a list of
//! steps to replay against a [`DialogManager`]. The page is given as HTML
//! markup, as element trees, or both (trees are appended after the markup).
//! Scenarios are written in YAML or JSON:
//!
//! ```yaml
//! html: |
//!   <main id="main"></main>
//!   <div id="dialogAbout"><p>Version 0.1.0</p></div>
//! dialogs:
//!   - { name: about, anchor: dialogAbout, title: About, modal: false }
//! steps:
//!   - { action: show, dialog: about }
//!   - { action: wait, ms: 50 }
//!   - { action: click, selector: "#dialogAbout" }
//!   - { action: dump }
//! ```

use anyhow::{anyhow, Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::animations::{FadeScale, SlideDirection, SlideIn};
use crate::config::Config;
use crate::dialogs::{alert, Dialog, DialogBehavior, DialogManager, DialogOptions};
use crate::document::{Document, NodeSpec};

fn default_true() -> bool {
    true
}

/// Entrance transition of a declared dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStyle {
    #[default]
    Fade,
    SlideLeft,
    SlideRight,
    SlideTop,
    SlideBottom,
}

impl TransitionStyle {
    fn behavior(self) -> Arc<dyn DialogBehavior> {
        match self {
            TransitionStyle::Fade => Arc::new(FadeScale),
            TransitionStyle::SlideLeft => Arc::new(SlideIn::new(SlideDirection::FromLeft)),
            TransitionStyle::SlideRight => Arc::new(SlideIn::new(SlideDirection::FromRight)),
            TransitionStyle::SlideTop => Arc::new(SlideIn::new(SlideDirection::FromTop)),
            TransitionStyle::SlideBottom => Arc::new(SlideIn::new(SlideDirection::FromBottom)),
        }
    }
}

/// A dialog bound at scenario start
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DialogDecl {
    /// Name used by steps to refer to this dialog
    pub name: String,
    /// Element id of the anchor
    pub anchor: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_true")]
    pub modal: bool,
    #[serde(default = "default_true")]
    pub close_button: bool,
    #[serde(default)]
    pub transition: TransitionStyle,
}

/// One scripted action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Show { dialog: String },
    Dismiss { dialog: String },
    DismissTop,
    DismissAll,
    /// Advance the transition clock
    Wait { ms: u64 },
    /// Click the first element matching `selector`
    Click { selector: String },
    /// Show the alert dialog with `message`
    Alert { message: String },
    /// Print the document outline and the layer stack
    Dump,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Scenario {
    /// Page markup; fragments land in `body`
    #[serde(default)]
    pub html: Option<String>,
    /// Element trees appended to `body`
    #[serde(default)]
    pub document: Vec<NodeSpec>,
    #[serde(default)]
    pub dialogs: Vec<DialogDecl>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Invalid YAML scenario")
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Invalid JSON scenario")
    }

    /// Parse by file extension; anything but `.json` is read as YAML
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(content),
            _ => Self::from_yaml(content),
        }
    }

    /// Host document described by `html` followed by `document`
    pub fn build_document(&self) -> Document {
        let mut document = match &self.html {
            Some(markup) => Document::parse(markup),
            None => Document::new(),
        };
        document.extend(&self.document);
        document
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::parse(path, &content)
    }
}

/// Replays scenario steps against a manager
pub struct Player {
    manager: DialogManager,
    dialogs: HashMap<String, Dialog>,
}

impl Player {
    /// Build the document and bind every declared dialog, in order
    pub fn new(scenario: &Scenario, config: Config) -> Result<Self> {
        let mut manager = DialogManager::with_config(scenario.build_document(), config);
        let mut dialogs = HashMap::new();

        for decl in &scenario.dialogs {
            let options = DialogOptions::new()
                .modal(decl.modal)
                .close_button(decl.close_button);
            let dialog = Dialog::with_behavior(
                manager.document_mut(),
                &decl.anchor,
                &decl.title,
                options,
                decl.transition.behavior(),
            )
            .with_context(|| format!("Failed to bind dialog '{}'", decl.name))?;
            debug!("Bound dialog '{}' to {}", decl.name, dialog.id());
            dialogs.insert(decl.name.clone(), dialog);
        }

        Ok(Self { manager, dialogs })
    }

    pub fn manager(&self) -> &DialogManager {
        &self.manager
    }

    fn dialog(&self, name: &str) -> Result<Dialog> {
        self.dialogs
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("Unknown dialog '{}'", name))
    }

    fn stack_summary(&self) -> String {
        let ids: Vec<String> = self
            .manager
            .stack_ids()
            .iter()
            .map(|id| id.to_string())
            .collect();
        format!("[{}]", ids.join(", "))
    }

    /// Apply one step and describe the outcome
    pub fn apply(&mut self, step: &Step) -> Result<String> {
        let line = match step {
            Step::Show { dialog } => {
                let target = self.dialog(dialog)?;
                target.show(&mut self.manager);
                format!("show {} -> {}", dialog, self.stack_summary())
            }
            Step::Dismiss { dialog } => {
                let target = self.dialog(dialog)?;
                target.dismiss(&mut self.manager);
                format!("dismiss {} -> {}", dialog, self.stack_summary())
            }
            Step::DismissTop => {
                self.manager.dismiss_top();
                format!("dismiss_top -> {}", self.stack_summary())
            }
            Step::DismissAll => {
                self.manager.dismiss_all();
                format!("dismiss_all -> {}", self.stack_summary())
            }
            Step::Wait { ms } => {
                let applied = self.manager.advance(Duration::from_millis(*ms));
                format!("wait {}ms -> {} transition(s)", ms, applied)
            }
            Step::Click { selector } => {
                if self.manager.click_selector(selector) {
                    format!("click {} -> {}", selector, self.stack_summary())
                } else {
                    format!("click {} -> no match", selector)
                }
            }
            Step::Alert { message } => {
                alert(&mut self.manager, message)?;
                format!("alert {:?} -> {}", message, self.stack_summary())
            }
            Step::Dump => {
                let mut out = self.manager.document().outline();
                for layer in self.manager.layers() {
                    out.push_str(&format!("layer {}\n", layer));
                }
                out.trim_end().to_string()
            }
        };
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r##"
document:
  - { tag: main, id: main }
  - tag: div
    id: dialogAbout
    children: [{ tag: p, text: "Version 0.1.0" }]
  - tag: div
    id: dialogAlert
    children: [{ tag: p, id: alertMessage }]
dialogs:
  - { name: about, anchor: dialogAbout, title: About, modal: false }
steps:
  - { action: show, dialog: about }
  - { action: alert, message: "oops" }
  - { action: wait, ms: 50 }
  - { action: dismiss_top }
  - { action: click, selector: "#dialogAbout" }
  - { action: dump }
"##;

    #[test]
    fn test_parse_yaml() {
        let scenario = Scenario::from_yaml(YAML).unwrap();
        assert_eq!(scenario.document.len(), 3);
        assert_eq!(scenario.dialogs[0].transition, TransitionStyle::Fade);
        assert!(scenario.dialogs[0].close_button);
        assert!(!scenario.dialogs[0].modal);
        assert_eq!(scenario.steps[3], Step::DismissTop);
        assert_eq!(scenario.steps[2], Step::Wait { ms: 50 });
    }

    #[test]
    fn test_parse_picks_format_by_extension() {
        let json = r#"{ "steps": [{ "action": "dismiss_all" }] }"#;
        let scenario = Scenario::parse(Path::new("s.json"), json).unwrap();
        assert_eq!(scenario.steps, vec![Step::DismissAll]);

        assert!(Scenario::parse(Path::new("s.json"), "steps: []").is_err());
    }

    #[test]
    fn test_replay() {
        let scenario = Scenario::from_yaml(YAML).unwrap();
        let mut player = Player::new(&scenario, Config::default()).unwrap();

        let lines: Vec<String> = scenario
            .steps
            .iter()
            .map(|step| player.apply(step).unwrap())
            .collect();

        assert_eq!(lines[0], "show about -> [#dialogAbout]");
        assert_eq!(lines[1], "alert \"oops\" -> [#dialogAbout, #dialogAlert]");
        assert_eq!(lines[2], "wait 50ms -> 4 transition(s)");
        assert_eq!(lines[3], "dismiss_top -> [#dialogAbout]");
        assert_eq!(lines[4], "click #dialogAbout -> []");
        assert!(lines[5].starts_with("body\n  main#main\n"));
        assert!(player.manager().is_empty());
    }

    #[test]
    fn test_replay_markup_page() {
        let yaml = r##"
html: |
  <main id="main"><button id="open">About</button></main>
  <div id="dialogAbout" class="page"><p class="version">0.1.0</p></div>
document:
  - { tag: footer, id: footer }
dialogs:
  - { name: about, anchor: dialogAbout, title: About, modal: false, transition: slide_top }
steps:
  - { action: show, dialog: about }
  - { action: click, selector: "#dialogAbout .version" }
  - { action: click, selector: "#dialogAbout" }
  - { action: click, selector: "main > #missing" }
"##;
        let scenario = Scenario::from_yaml(yaml).unwrap();
        let mut player = Player::new(&scenario, Config::default()).unwrap();

        let document = player.manager().document();
        let children = document.get(document.root()).unwrap().children();
        assert_eq!(children.len(), 3);
        assert_eq!(document.find_by_id("footer"), children.last().copied());

        let lines: Vec<String> = scenario
            .steps
            .iter()
            .map(|step| player.apply(step).unwrap())
            .collect();
        assert_eq!(lines[0], "show about -> [#dialogAbout]");
        // Clicks inside the frame stop before the backdrop
        assert_eq!(lines[1], "click #dialogAbout .version -> [#dialogAbout]");
        assert_eq!(lines[2], "click #dialogAbout -> []");
        assert_eq!(lines[3], "click main > #missing -> no match");
    }

    #[test]
    fn test_unknown_dialog_and_missing_anchor() {
        let scenario = Scenario::default();
        let mut player = Player::new(&scenario, Config::default()).unwrap();
        let err = player
            .apply(&Step::Show { dialog: "ghost".into() })
            .unwrap_err();
        assert!(err.to_string().contains("ghost"));

        let scenario = Scenario {
            dialogs: vec![DialogDecl {
                name: "x".into(),
                anchor: "missing".into(),
                title: String::new(),
                modal: true,
                close_button: true,
                transition: TransitionStyle::Fade,
            }],
            ..Scenario::default()
        };
        let err = Player::new(&scenario, Config::default()).err().unwrap();
        assert!(format!("{:#}", err).contains("selector (#missing) is not found"));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.yaml");
        std::fs::write(&path, YAML).unwrap();

        let scenario = Scenario::load(&path).await.unwrap();
        assert_eq!(scenario.steps.len(), 6);
        assert!(Scenario::load(&dir.path().join("nope.yaml")).await.is_err());
    }
}
